//! # Integration Tests
//!
//! End-to-end flows across the signature crate, the ledger and the node's
//! request protocol.

pub mod flows;

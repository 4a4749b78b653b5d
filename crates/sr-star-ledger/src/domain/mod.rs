//! # Domain Layer
//!
//! Pure ledger logic: blocks, the chain, and ownership challenges.
//! Nothing here locks, reads a clock, or verifies signatures.

pub mod block;
pub mod chain;
pub mod challenge;
pub mod entities;
pub mod errors;
pub mod value_objects;

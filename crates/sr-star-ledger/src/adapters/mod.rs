//! # Adapters Module
//!
//! Concrete implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `clock`: system and manually driven time sources
//! - `wallet`: ownership verification by Bitcoin signed message or `personal_sign`

pub mod clock;
pub mod wallet;

pub use clock::{ManualTimeSource, SystemTimeSource};
pub use wallet::WalletOwnershipVerifier;

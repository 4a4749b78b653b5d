//! # Star Ledger
//!
//! An append-only, hash-chained ledger of star registrations. Each entry is
//! admitted only after its submitter proves control of a wallet by signing a
//! short-lived ownership challenge.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Single Genesis | One block at height 0 with no previous hash |
//! | 2 | Linked Blocks | Each block stores the hash of its predecessor |
//! | 3 | Self-Consistent Hash | SHA-256 of the canonical form equals the stored hash |
//! | 4 | Fresh Challenges | Challenges older than the window are refused |
//! | 5 | Serialized Writes | One submission at a time, heights contiguous |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain logic (block, chain, challenge, errors)
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `service/` - Application service implementing the API
//! - `adapters/` - Clocks and the wallet signature verifier (Bitcoin or EIP-191)
//!
//! ## Usage
//!
//! ```ignore
//! use sr_star_ledger::{LedgerConfig, StarRegistryApi, WalletStarRegistry};
//!
//! let ledger = WalletStarRegistry::with_wallet_verifier(LedgerConfig::default())?;
//!
//! let challenge = ledger.request_ownership_challenge(&address);
//! // ... wallet signs `challenge` ...
//! let block = ledger.submit_entry(&address, &challenge, &signature, star)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{ManualTimeSource, SystemTimeSource, WalletOwnershipVerifier};
pub use domain::block::Block;
pub use domain::chain::Chain;
pub use domain::challenge::OwnershipChallenge;
pub use domain::entities::{GenesisPayload, StarEntry, GENESIS_DATA};
pub use domain::errors::LedgerError;
pub use domain::value_objects::{
    LedgerConfig, SignatureScheme, UnknownSignatureScheme, DEFAULT_CHALLENGE_WINDOW_SECS,
    DEFAULT_PROTOCOL_TAG,
};
pub use ports::inbound::StarRegistryApi;
pub use ports::outbound::{OwnershipVerifier, TimeSource};
pub use service::{LedgerDependencies, StarRegistryService, WalletStarRegistry};

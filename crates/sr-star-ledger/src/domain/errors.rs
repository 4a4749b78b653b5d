//! # Domain Errors
//!
//! Error types for the star ledger.
//!
//! ## Design Principles
//!
//! - Each rejection path maps to one variant
//! - No panics in domain logic (use Result instead)
//! - A returned error always means the chain was left untouched

use sr_signature_verification::SignatureError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Chain validation found problems; writes are refused until resolved.
    #[error("Chain is corrupted: {} problem(s): {}", .problems.len(), .problems.join("; "))]
    ChainCorrupted { problems: Vec<String> },

    /// The ownership challenge is older than the freshness window.
    #[error("Challenge expired: issued at {challenge_time}, now {now}, window {window_secs}s")]
    ChallengeExpired {
        challenge_time: u64,
        now: u64,
        window_secs: u64,
    },

    /// The challenge is not of the form `identity:timestamp:tag`.
    #[error("Malformed challenge: {challenge:?}")]
    MalformedChallenge { challenge: String },

    /// The signature does not prove ownership of the identity.
    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    /// No block carries the requested hash.
    #[error("Block not found: {hash}")]
    NotFound { hash: String },

    /// The genesis block holds no application payload.
    #[error("The genesis block carries no application payload")]
    GenesisBlock,

    /// The block body could not be encoded or decoded.
    #[error("Malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// Computing a block digest failed.
    #[error("Hashing failed: {reason}")]
    Hashing { reason: String },
}

impl LedgerError {
    /// Whether the caller may retry the same operation with fresh input.
    ///
    /// Protocol errors are retryable with a new challenge or signature;
    /// integrity and internal errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::ChallengeExpired { .. }
                | LedgerError::MalformedChallenge { .. }
                | LedgerError::InvalidSignature(_)
        )
    }
}

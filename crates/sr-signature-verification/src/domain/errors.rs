//! # Signature Errors
//!
//! Error types for wallet message verification.

use thiserror::Error;

/// Errors that can occur while verifying a signed wallet message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature does not decode to 65 bytes
    #[error("Invalid signature format")]
    InvalidFormat,

    /// The claimed signer is not an address of the expected scheme
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID or compact-signature header
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Recovered signer does not match the claimed address (20-byte signer ids)
    #[error("Signer mismatch: expected 0x{}, got 0x{}", hex::encode(.expected), hex::encode(.actual))]
    SignerMismatch {
        expected: [u8; 20],
        actual: [u8; 20],
    },
}

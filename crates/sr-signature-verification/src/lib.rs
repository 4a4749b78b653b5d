//! # Wallet Signature Verification
//!
//! Verifies that a wallet address controls the private key behind a message
//! signature. Two secp256k1 schemes are supported:
//!
//! - **Bitcoin signed messages** (`domain::bitcoin`): base58check P2PKH
//!   addresses, base64 compact signatures, double SHA-256 digest
//! - **`personal_sign`** (`domain::ecdsa`, EIP-191): hex addresses, hex
//!   `r || s || v` signatures, Keccak-256 digest
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: Signatures with high S values are rejected
//! - Signer identity is proven by public-key recovery; no public key is ever stored

pub mod domain;

// Re-export public API
pub use domain::bitcoin::{
    bitcoin_message_hash, format_bitcoin_address, parse_bitcoin_address, pubkey_hash,
    recover_pubkey_hash, verify_bitcoin_message, BitcoinMessageVerifier, CompactSignature,
    PubkeyHash, P2PKH_VERSION,
};
pub use domain::ecdsa::{
    address_from_pubkey, keccak256, personal_message_hash, recover_address, verify_message,
    WalletVerifier,
};
pub use domain::entities::{format_address, parse_address, Address, Hash, WalletSignature};
pub use domain::errors::SignatureError;

/// Key generation and signing in both wallet schemes.
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    pub use crate::domain::bitcoin::test_helpers::*;
    pub use crate::domain::ecdsa::test_helpers::*;
}

//! # Value Objects
//!
//! Configuration for the ledger.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default freshness window for ownership challenges.
pub const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 300;

/// Default protocol tag appended to ownership challenges.
pub const DEFAULT_PROTOCOL_TAG: &str = "starRegistry";

/// Configuration for the ledger.
///
/// All configuration values have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Maximum challenge age in seconds (default: 300).
    ///
    /// A challenge exactly this old is still accepted.
    pub challenge_window_secs: u64,

    /// Tag written as the last field of every challenge (default: `starRegistry`).
    pub protocol_tag: String,

    /// How ownership signatures are checked (default: Bitcoin signed messages).
    pub signature_scheme: SignatureScheme,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            challenge_window_secs: DEFAULT_CHALLENGE_WINDOW_SECS,
            protocol_tag: DEFAULT_PROTOCOL_TAG.to_string(),
            signature_scheme: SignatureScheme::default(),
        }
    }
}

/// Wallet message-signing scheme used to prove ownership of an identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// Base58check P2PKH address, base64 compact signature.
    #[default]
    Bitcoin,
    /// Hex address, hex `personal_sign` (EIP-191) signature.
    Ethereum,
}

impl SignatureScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureScheme::Bitcoin => "bitcoin",
            SignatureScheme::Ethereum => "ethereum",
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheme name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown signature scheme {0:?} (expected bitcoin or ethereum)")]
pub struct UnknownSignatureScheme(pub String);

impl FromStr for SignatureScheme {
    type Err = UnknownSignatureScheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(SignatureScheme::Bitcoin),
            "ethereum" | "eth" | "eip191" => Ok(SignatureScheme::Ethereum),
            _ => Err(UnknownSignatureScheme(value.to_string())),
        }
    }
}

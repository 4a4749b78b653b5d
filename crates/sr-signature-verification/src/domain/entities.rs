//! # Domain Entities
//!
//! Core data structures for wallet signature verification.

use super::errors::SignatureError;

/// Ethereum-style address derived from public key (last 20 bytes of keccak256(pubkey))
pub type Address = [u8; 20];

/// 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// Recoverable ECDSA signature on the secp256k1 curve, as produced by wallets.
///
/// Wire format: `r (32) || s (32) || v (1)`, hex encoded, optional `0x` prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl WalletSignature {
    /// Encoded length in bytes.
    pub const LEN: usize = 65;

    /// Parse a hex-encoded `r || s || v` signature.
    pub fn from_hex(encoded: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(strip_hex_prefix(encoded.trim()))
            .map_err(|_| SignatureError::InvalidFormat)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a raw 65-byte `r || s || v` signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != Self::LEN {
            return Err(SignatureError::InvalidFormat);
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// Serialize to raw bytes.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Serialize to `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

/// Parse a 20-byte hex address. Case-insensitive, optional `0x` prefix.
pub fn parse_address(encoded: &str) -> Result<Address, SignatureError> {
    let trimmed = encoded.trim();
    let bytes = hex::decode(strip_hex_prefix(trimmed))
        .map_err(|_| SignatureError::InvalidAddress(trimmed.to_string()))?;
    if bytes.len() != 20 {
        return Err(SignatureError::InvalidAddress(trimmed.to_string()));
    }
    let mut address = [0u8; 20];
    address.copy_from_slice(&bytes);
    Ok(address)
}

/// Format an address as `0x` + lowercase hex.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

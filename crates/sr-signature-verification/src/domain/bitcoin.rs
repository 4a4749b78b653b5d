//! # Bitcoin Signed Messages
//!
//! Verifies messages signed the way Bitcoin wallets sign them
//! (`signmessage` / `verifymessage`):
//!
//! - digest: `sha256d("\x18Bitcoin Signed Message:\n" || varint(len) || message)`
//! - signature: base64 of 65 bytes, `header || r || s`, where the header
//!   carries the recovery id and whether the signer's key is compressed
//! - identity: a base58check P2PKH address, `version || hash160(pubkey)`
//!
//! Only legacy headers (27..=34) are accepted. Segwit-style headers
//! (35..=42) are rejected with `InvalidRecoveryId`.
//!
//! The address version byte is not checked, so testnet and mainnet
//! addresses for the same key both verify.

use super::ecdsa::{check_scalars, recover_key};
use super::entities::Hash;
use super::errors::SignatureError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use k256::ecdsa::{RecoveryId, VerifyingKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Prefix wallets prepend before hashing a message. The first byte is the
/// length of the text that follows.
pub const BITCOIN_MESSAGE_PREFIX: &[u8] = b"\x18Bitcoin Signed Message:\n";

/// Mainnet P2PKH version byte.
pub const P2PKH_VERSION: u8 = 0x00;

/// First header byte for signatures by an uncompressed key.
const UNCOMPRESSED_HEADER: u8 = 27;

/// First header byte for signatures by a compressed key.
const COMPRESSED_HEADER: u8 = 31;

/// Last legacy header byte.
const MAX_LEGACY_HEADER: u8 = 34;

/// `ripemd160(sha256(pubkey))`.
pub type PubkeyHash = [u8; 20];

// =============================================================================
// COMPACT SIGNATURE
// =============================================================================

/// A 65-byte recoverable signature in Bitcoin's compact form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactSignature {
    /// `27 + recid` (uncompressed key) or `31 + recid` (compressed key)
    pub header: u8,
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
}

impl CompactSignature {
    /// Encoded length in bytes.
    pub const LEN: usize = 65;

    /// Parse a base64-encoded signature.
    pub fn from_base64(encoded: &str) -> Result<Self, SignatureError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| SignatureError::InvalidFormat)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a raw 65-byte `header || r || s` signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != Self::LEN {
            return Err(SignatureError::InvalidFormat);
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..]);
        Ok(Self {
            header: bytes[0],
            r,
            s,
        })
    }

    /// Serialize to raw bytes.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = self.header;
        out[1..33].copy_from_slice(&self.r);
        out[33..].copy_from_slice(&self.s);
        out
    }

    /// Serialize to standard base64, as wallets print it.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Recovery id encoded in the header.
    pub fn recovery_id(&self) -> Result<RecoveryId, SignatureError> {
        if !(UNCOMPRESSED_HEADER..=MAX_LEGACY_HEADER).contains(&self.header) {
            return Err(SignatureError::InvalidRecoveryId(self.header));
        }
        RecoveryId::try_from((self.header - UNCOMPRESSED_HEADER) & 3)
            .map_err(|_| SignatureError::InvalidRecoveryId(self.header))
    }

    /// Whether the signer's address hashes the compressed public key.
    pub fn is_compressed(&self) -> bool {
        self.header >= COMPRESSED_HEADER
    }
}

// =============================================================================
// VERIFIER
// =============================================================================

/// Stateless verifier for Bitcoin signed messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitcoinMessageVerifier;

impl BitcoinMessageVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Check that `signature` over `message` was produced by the key behind `address`.
    pub fn verify_message(
        &self,
        address: &str,
        message: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        verify_bitcoin_message(address, message, signature)
    }
}

/// Verify a base64 signature over a text message against a P2PKH address.
///
/// Address and signature are decoded before any curve arithmetic happens.
pub fn verify_bitcoin_message(
    address: &str,
    message: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let (_, expected) = parse_bitcoin_address(address)?;
    let signature = CompactSignature::from_base64(signature)?;
    let message_hash = bitcoin_message_hash(message.as_bytes());

    let actual = recover_pubkey_hash(&message_hash, &signature)?;
    if actual[..].ct_eq(&expected[..]).into() {
        Ok(())
    } else {
        tracing::debug!(
            "[sr-sig] signer mismatch: claimed {}, recovered {}",
            address.trim(),
            format_bitcoin_address(P2PKH_VERSION, &actual)
        );
        Err(SignatureError::SignerMismatch { expected, actual })
    }
}

/// Recover the signer's pubkey hash from a prehashed message.
///
/// Applies the same scalar-range and low-S checks as wallet signatures.
pub fn recover_pubkey_hash(
    message_hash: &Hash,
    signature: &CompactSignature,
) -> Result<PubkeyHash, SignatureError> {
    check_scalars(&signature.r, &signature.s)?;
    let recovery_id = signature.recovery_id()?;
    let key = recover_key(message_hash, &signature.r, &signature.s, recovery_id)?;

    Ok(pubkey_hash(&key, signature.is_compressed()))
}

// =============================================================================
// HASHING AND ADDRESSES
// =============================================================================

/// `sha256d(prefix || varint(len) || message)`.
pub fn bitcoin_message_hash(message: &[u8]) -> Hash {
    let mut preimage = Vec::with_capacity(BITCOIN_MESSAGE_PREFIX.len() + 9 + message.len());
    preimage.extend_from_slice(BITCOIN_MESSAGE_PREFIX);
    write_varint(&mut preimage, message.len() as u64);
    preimage.extend_from_slice(message);
    double_sha256(&preimage)
}

/// SHA-256 applied twice.
pub fn double_sha256(data: &[u8]) -> Hash {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&second);
    hash
}

/// `ripemd160(sha256(pubkey))` over the SEC1 encoding of `key`.
pub fn pubkey_hash(key: &VerifyingKey, compressed: bool) -> PubkeyHash {
    let encoded = key.to_encoded_point(compressed);
    let digest = Ripemd160::digest(Sha256::digest(encoded.as_bytes()));
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&digest);
    hash
}

/// Decode a base58check address into its version byte and pubkey hash.
pub fn parse_bitcoin_address(encoded: &str) -> Result<(u8, PubkeyHash), SignatureError> {
    let trimmed = encoded.trim();
    let payload = bs58::decode(trimmed)
        .with_check(None)
        .into_vec()
        .map_err(|_| SignatureError::InvalidAddress(trimmed.to_string()))?;
    if payload.len() != 21 {
        return Err(SignatureError::InvalidAddress(trimmed.to_string()));
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);
    Ok((payload[0], hash))
}

/// Encode a pubkey hash as a base58check address.
pub fn format_bitcoin_address(version: u8, hash: &PubkeyHash) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(version);
    payload.extend_from_slice(hash);
    bs58::encode(payload).with_check().into_string()
}

/// Bitcoin's CompactSize length prefix.
fn write_varint(out: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Bitcoin-wallet style signing, for tests in this and dependent crates.
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use super::*;
    use crate::domain::ecdsa::test_helpers::sign_prehash;
    use k256::ecdsa::SigningKey;

    /// Sign `message` as a wallet holding a compressed key would; returns base64.
    ///
    /// # Panics
    ///
    /// See [`sign_prehash`].
    pub fn sign_bitcoin_message(message: &str, private_key: &SigningKey) -> String {
        compact_signature(message, private_key, true).to_base64()
    }

    /// Sign `message` with an explicit key-compression header.
    pub fn compact_signature(
        message: &str,
        private_key: &SigningKey,
        compressed: bool,
    ) -> CompactSignature {
        let signature = sign_prehash(&bitcoin_message_hash(message.as_bytes()), private_key);
        let base = if compressed {
            COMPRESSED_HEADER
        } else {
            UNCOMPRESSED_HEADER
        };
        CompactSignature {
            header: base + (signature.v - 27),
            r: signature.r,
            s: signature.s,
        }
    }

    /// Mainnet P2PKH address of a signing key's compressed public key.
    pub fn bitcoin_address_of(private_key: &SigningKey) -> String {
        format_bitcoin_address(P2PKH_VERSION, &pubkey_hash(private_key.verifying_key(), true))
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================

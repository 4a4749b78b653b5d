//! # Block
//!
//! One immutable ledger entry and its self-verification logic.
//!
//! The block hash is the SHA-256 of the block's canonical JSON form with the
//! `hash` field set to `null`:
//!
//! ```text
//! {"hash":null,"height":1,"body":"7b22...","time":1700000000,"previousBlockHash":"ab12..."}
//! ```
//!
//! Field order is fixed by declaration order; changing it changes every hash.

use super::errors::LedgerError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A ledger entry.
///
/// `height`, `time`, `previous_block_hash` and `hash` are placeholders until
/// the chain assigns them on append.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Hex SHA-256 of the canonical form; `None` until appended.
    pub hash: Option<String>,
    /// Zero-based position in the chain.
    pub height: u64,
    /// Hex encoding of the JSON payload.
    pub body: String,
    /// Seconds since the Unix epoch, assigned on append.
    pub time: u64,
    /// Hash of the block at `height - 1`; `None` for genesis.
    pub previous_block_hash: Option<String>,
}

/// Hash input: a `Block` with `hash` forced to `null`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalBlock<'a> {
    hash: Option<&'a str>,
    height: u64,
    body: &'a str,
    time: u64,
    previous_block_hash: Option<&'a str>,
}

impl Block {
    /// Build an unplaced block carrying `payload`.
    pub fn new<T: Serialize + ?Sized>(payload: &T) -> Result<Self, LedgerError> {
        let json = serde_json::to_vec(payload).map_err(|e| LedgerError::MalformedPayload {
            reason: e.to_string(),
        })?;

        Ok(Self {
            hash: None,
            height: 0,
            body: hex::encode(json),
            time: 0,
            previous_block_hash: None,
        })
    }

    /// Digest of the canonical form, ignoring whatever `hash` currently holds.
    pub fn compute_hash(&self) -> Result<String, LedgerError> {
        let canonical = CanonicalBlock {
            hash: None,
            height: self.height,
            body: &self.body,
            time: self.time,
            previous_block_hash: self.previous_block_hash.as_deref(),
        };
        let bytes = serde_json::to_vec(&canonical).map_err(|e| LedgerError::Hashing {
            reason: e.to_string(),
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Whether the stored hash matches the recomputed one.
    ///
    /// A block that was never hashed is not valid.
    pub fn validate(&self) -> Result<bool, LedgerError> {
        match &self.hash {
            Some(stored) => Ok(*stored == self.compute_hash()?),
            None => Ok(false),
        }
    }

    /// Decode the application payload.
    ///
    /// Fails with [`LedgerError::GenesisBlock`] at height 0 without looking
    /// at the body.
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, LedgerError> {
        if self.is_genesis() {
            return Err(LedgerError::GenesisBlock);
        }

        let bytes = hex::decode(&self.body).map_err(|e| LedgerError::MalformedPayload {
            reason: format!("body is not hex: {}", e),
        })?;
        let text = String::from_utf8(bytes).map_err(|e| LedgerError::MalformedPayload {
            reason: format!("body is not UTF-8: {}", e),
        })?;

        serde_json::from_str(&text).map_err(|e| LedgerError::MalformedPayload {
            reason: e.to_string(),
        })
    }

    /// Height 0.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// Hash for log and problem messages.
    pub fn hash_display(&self) -> &str {
        self.hash.as_deref().unwrap_or("<unhashed>")
    }
}

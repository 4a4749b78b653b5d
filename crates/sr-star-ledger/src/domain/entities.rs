//! # Domain Entities
//!
//! Payload types stored in block bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of the genesis block.
pub const GENESIS_DATA: &str = "Genesis Block";

/// A star registered on behalf of a wallet address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarEntry {
    /// The identity that proved ownership when submitting.
    pub address: String,
    /// Opaque application payload.
    pub star: Value,
}

/// Body of the genesis block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisPayload {
    pub data: String,
}

impl Default for GenesisPayload {
    fn default() -> Self {
        Self {
            data: GENESIS_DATA.to_string(),
        }
    }
}

//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the star ledger.

use crate::domain::block::Block;
use crate::domain::entities::StarEntry;
use crate::domain::errors::LedgerError;
use serde_json::Value;

/// Primary API for the star ledger.
///
/// Every method takes `&self`; implementations synchronize internally and
/// are shared across threads.
pub trait StarRegistryApi: Send + Sync {
    /// The chain's height counter.
    ///
    /// This is the number of blocks (tip index + 1), kept for wire
    /// compatibility with existing clients. See [`Self::tip_height`].
    fn get_height(&self) -> u64;

    /// Height of the newest block.
    fn tip_height(&self) -> u64;

    /// Build the message a wallet must sign to prove it controls `identity`.
    ///
    /// Format: `identity:<now>:<protocol tag>`. Nothing is recorded.
    fn request_ownership_challenge(&self, identity: &str) -> String;

    /// Record `star` on behalf of `identity`.
    ///
    /// ## Checks, in order
    ///
    /// 1. Chain validates with no problems (`ChainCorrupted`)
    /// 2. Challenge is parseable (`MalformedChallenge`)
    /// 3. Challenge is at most the configured window old (`ChallengeExpired`)
    /// 4. Signature over the challenge recovers `identity` (`InvalidSignature`)
    ///
    /// Any error leaves the chain unchanged.
    fn submit_entry(
        &self,
        identity: &str,
        challenge: &str,
        signature: &str,
        star: Value,
    ) -> Result<Block, LedgerError>;

    /// Append an arbitrary block without an ownership check.
    ///
    /// Placement fields of `block` are overwritten.
    fn append(&self, block: Block) -> Result<Block, LedgerError>;

    /// Block with the given hash.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no block carries this hash
    fn find_by_hash(&self, hash: &str) -> Result<Block, LedgerError>;

    /// Block at the given height, if any.
    fn find_by_height(&self, height: u64) -> Option<Block>;

    /// Every entry submitted by `identity`, oldest first. Genesis is never included.
    fn list_entries_by_identity(&self, identity: &str) -> Vec<StarEntry>;

    /// Problems found in the chain; empty when the chain is intact.
    fn validate(&self) -> Result<Vec<String>, LedgerError>;
}

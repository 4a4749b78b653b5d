//! # Chain
//!
//! The ordered, append-only block sequence and the algorithms over it.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Single Genesis | Exactly one block at height 0, no previous hash |
//! | 2 | Linked Blocks | `previous_block_hash(h) == hash(h - 1)` for h > 0 |
//! | 3 | Self-Consistent Hash | Stored hash equals the recomputed digest |
//! | 4 | Append-Only | Blocks are never mutated or removed once pushed |
//!
//! `Chain` holds no lock and reads no clock. The service layer owns the lock
//! and passes the current time in.

use super::block::Block;
use super::entities::{GenesisPayload, StarEntry};
use super::errors::LedgerError;

/// In-memory block sequence, indexed by height.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    blocks: Vec<Block>,
    /// Cached block count; `None` until the first append.
    height: Option<u64>,
}

impl Chain {
    /// An empty chain, without genesis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the genesis block if nothing has been appended yet.
    pub fn initialize(&mut self, now: u64) -> Result<(), LedgerError> {
        if self.height.is_some() {
            return Ok(());
        }

        let genesis = Block::new(&GenesisPayload::default())?;
        self.append(genesis, now)?;
        Ok(())
    }

    /// Place `block` on top of the chain and return the finalized copy.
    ///
    /// Height, time, previous hash and hash are all overwritten. The push is
    /// the last step, so a failure leaves the chain as it was.
    pub fn append(&mut self, mut block: Block, now: u64) -> Result<Block, LedgerError> {
        block.height = self.blocks.len() as u64;
        block.time = now;
        block.previous_block_hash = self.blocks.last().and_then(|last| last.hash.clone());
        block.hash = Some(block.compute_hash()?);

        self.blocks.push(block.clone());
        self.height = Some(self.blocks.len() as u64);

        Ok(block)
    }

    /// Cached height counter: the number of blocks, not the tip index.
    pub fn height(&self) -> u64 {
        self.height.unwrap_or(0)
    }

    /// Height of the newest block.
    pub fn tip_height(&self) -> Option<u64> {
        self.blocks.last().map(|b| b.height)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Linear scan by hash; a miss is an error.
    pub fn find_by_hash(&self, hash: &str) -> Result<&Block, LedgerError> {
        self.blocks
            .iter()
            .find(|b| b.hash.as_deref() == Some(hash))
            .ok_or_else(|| LedgerError::NotFound {
                hash: hash.to_string(),
            })
    }

    /// Linear scan by height; a miss is `None`.
    pub fn find_by_height(&self, height: u64) -> Option<&Block> {
        self.blocks.iter().find(|b| b.height == height)
    }

    /// Star entries submitted by `identity`, in chain order.
    ///
    /// The first block is always skipped. Blocks that fail to decode are
    /// treated as belonging to someone else.
    pub fn entries_by_identity(&self, identity: &str) -> Vec<StarEntry> {
        self.blocks
            .iter()
            .skip(1)
            .filter_map(|block| match block.decode_payload::<StarEntry>() {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(
                        "[sr-ledger] skipping block #{} while listing: {}",
                        block.height,
                        e
                    );
                    None
                }
            })
            .filter(|entry| entry.address == identity)
            .collect()
    }

    /// Check every block, returning one message per problem found.
    ///
    /// The previous hash is tracked while scanning rather than looked up by
    /// index, so a block is compared with the one actually preceding it.
    pub fn validate(&self) -> Result<Vec<String>, LedgerError> {
        let mut problems = Vec::new();
        let mut previous_hash: Option<&str> = None;

        for block in &self.blocks {
            if !block.validate()? {
                problems.push(format!("Block {} is invalid", block.hash_display()));
            }

            if block.height != 0 && block.previous_block_hash.as_deref() != previous_hash {
                problems.push(format!(
                    "Block {} has invalid previous hash",
                    block.hash_display()
                ));
            }

            previous_hash = block.hash.as_deref();
        }

        Ok(problems)
    }

    /// Mutable access for tamper simulations.
    #[cfg(test)]
    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

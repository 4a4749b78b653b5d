//! # Star Registry API Implementation
//!
//! Implements the StarRegistryApi trait for reads, appends and submissions.

use super::*;
use crate::domain::entities::StarEntry;
use crate::ports::inbound::StarRegistryApi;
use serde_json::Value;

impl<TS, OV> StarRegistryApi for StarRegistryService<TS, OV>
where
    TS: TimeSource,
    OV: OwnershipVerifier,
{
    fn get_height(&self) -> u64 {
        self.chain.read().height()
    }

    fn tip_height(&self) -> u64 {
        self.chain.read().tip_height().unwrap_or(0)
    }

    fn request_ownership_challenge(&self, identity: &str) -> String {
        let now = self.time_source.now();
        OwnershipChallenge::new(identity, now, self.config.protocol_tag.as_str()).to_string()
    }

    fn submit_entry(
        &self,
        identity: &str,
        challenge: &str,
        signature: &str,
        star: Value,
    ) -> Result<Block, LedgerError> {
        let mut chain = self.chain.write();
        let now = self.time_source.now();

        let result = Self::check_chain_intact(&chain)
            .and_then(|()| self.check_challenge_fresh(challenge, now))
            .and_then(|()| {
                self.verifier
                    .verify_ownership(identity, challenge, signature)
                    .map_err(LedgerError::from)
            })
            .and_then(|()| {
                Block::new(&StarEntry {
                    address: identity.to_string(),
                    star,
                })
            })
            .and_then(|block| chain.append(block, now));

        match &result {
            Ok(block) => tracing::info!(
                height = block.height,
                hash = %block.hash_display(),
                identity,
                "[sr-ledger] star registered"
            ),
            Err(e) => tracing::warn!(identity, error = %e, "[sr-ledger] submission rejected"),
        }

        result
    }

    fn append(&self, block: Block) -> Result<Block, LedgerError> {
        let mut chain = self.chain.write();
        let now = self.time_source.now();
        let block = chain.append(block, now)?;

        tracing::info!(
            height = block.height,
            hash = %block.hash_display(),
            "[sr-ledger] block appended"
        );
        Ok(block)
    }

    fn find_by_hash(&self, hash: &str) -> Result<Block, LedgerError> {
        self.chain.read().find_by_hash(hash).cloned()
    }

    fn find_by_height(&self, height: u64) -> Option<Block> {
        self.chain.read().find_by_height(height).cloned()
    }

    fn list_entries_by_identity(&self, identity: &str) -> Vec<StarEntry> {
        self.chain.read().entries_by_identity(identity)
    }

    fn validate(&self) -> Result<Vec<String>, LedgerError> {
        let problems = self.chain.read().validate()?;
        if !problems.is_empty() {
            tracing::warn!(count = problems.len(), "[sr-ledger] chain validation found problems");
        }
        Ok(problems)
    }
}

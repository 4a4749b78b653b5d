//! # Star Registry Service
//!
//! The application service implementing [`StarRegistryApi`].
//!
//! ## Architecture
//!
//! This service:
//! 1. Owns the chain behind a `parking_lot::RwLock`
//! 2. Bootstraps genesis before the handle is returned
//! 3. Runs the ownership protocol (validate, freshness, signature, append)
//!    under a single write guard
//! 4. Uses dependency injection for the clock and the signature check
//!
//! [`StarRegistryApi`]: crate::ports::inbound::StarRegistryApi

mod registry;

use crate::adapters::{SystemTimeSource, WalletOwnershipVerifier};
use crate::domain::block::Block;
use crate::domain::chain::Chain;
use crate::domain::challenge::OwnershipChallenge;
use crate::domain::errors::LedgerError;
use crate::domain::value_objects::LedgerConfig;
use crate::ports::outbound::{OwnershipVerifier, TimeSource};
use parking_lot::RwLock;

/// The star ledger service.
///
/// `Send + Sync`; share it through an `Arc`.
pub struct StarRegistryService<TS, OV>
where
    TS: TimeSource,
    OV: OwnershipVerifier,
{
    /// The chain. Writers hold the guard for the whole submission.
    pub(crate) chain: RwLock<Chain>,
    pub(crate) time_source: TS,
    pub(crate) verifier: OV,
    pub(crate) config: LedgerConfig,
}

/// Dependencies for StarRegistryService
pub struct LedgerDependencies<TS, OV> {
    pub time_source: TS,
    pub verifier: OV,
}

/// Service wired to the system clock and wallet signatures.
pub type WalletStarRegistry = StarRegistryService<SystemTimeSource, WalletOwnershipVerifier>;

impl WalletStarRegistry {
    /// Create a service with production adapters.
    pub fn with_wallet_verifier(config: LedgerConfig) -> Result<Self, LedgerError> {
        Self::new(
            LedgerDependencies {
                time_source: SystemTimeSource,
                verifier: WalletOwnershipVerifier::new(config.signature_scheme),
            },
            config,
        )
    }
}

impl<TS, OV> StarRegistryService<TS, OV>
where
    TS: TimeSource,
    OV: OwnershipVerifier,
{
    /// Create the service and append the genesis block.
    ///
    /// ## Errors
    ///
    /// - `Hashing`: the genesis block could not be hashed
    pub fn new(deps: LedgerDependencies<TS, OV>, config: LedgerConfig) -> Result<Self, LedgerError> {
        let mut chain = Chain::new();
        let now = deps.time_source.now();
        chain.initialize(now)?;

        tracing::info!(
            genesis = %chain.find_by_height(0).map(Block::hash_display).unwrap_or_default(),
            window_secs = config.challenge_window_secs,
            tag = %config.protocol_tag,
            scheme = %config.signature_scheme,
            "[sr-ledger] ledger initialized"
        );

        Ok(Self {
            chain: RwLock::new(chain),
            time_source: deps.time_source,
            verifier: deps.verifier,
            config,
        })
    }

    /// Configuration the ledger was created with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Every block, cloned under one read guard.
    pub fn snapshot(&self) -> Vec<Block> {
        self.chain.read().blocks().to_vec()
    }

    /// Reject the submission unless the chain is intact.
    fn check_chain_intact(chain: &Chain) -> Result<(), LedgerError> {
        let problems = chain.validate()?;
        if problems.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::ChainCorrupted { problems })
        }
    }

    /// Reject the submission unless the challenge is parseable and fresh.
    fn check_challenge_fresh(&self, challenge: &str, now: u64) -> Result<(), LedgerError> {
        let parsed = OwnershipChallenge::parse(challenge)?;
        let window_secs = self.config.challenge_window_secs;

        if parsed.is_fresh(now, window_secs) {
            Ok(())
        } else {
            Err(LedgerError::ChallengeExpired {
                challenge_time: parsed.timestamp,
                now,
                window_secs,
            })
        }
    }

    /// Test hook for corrupting the chain in place.
    #[cfg(test)]
    pub(crate) fn chain(&self) -> &RwLock<Chain> {
        &self.chain
    }
}

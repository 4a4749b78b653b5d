//! # Ownership Challenge
//!
//! The message a wallet signs to prove it controls an identity:
//!
//! ```text
//! identity:timestamp:tag      e.g. 0x9f…c2:1700000000:starRegistry
//! ```
//!
//! Challenges are not recorded anywhere. Freshness is judged purely from the
//! timestamp embedded in the string the caller hands back.

use super::errors::LedgerError;
use std::fmt;

/// A parsed `identity:timestamp:tag` challenge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipChallenge {
    pub identity: String,
    pub timestamp: u64,
    pub tag: String,
}

impl OwnershipChallenge {
    pub fn new(identity: impl Into<String>, timestamp: u64, tag: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            timestamp,
            tag: tag.into(),
        }
    }

    /// Parse a challenge string.
    ///
    /// Fields are split from the right, so an identity containing `:` keeps
    /// its colons.
    pub fn parse(message: &str) -> Result<Self, LedgerError> {
        let malformed = || LedgerError::MalformedChallenge {
            challenge: message.to_string(),
        };

        let mut parts = message.rsplitn(3, ':');
        let tag = parts.next().ok_or_else(malformed)?;
        let timestamp = parts.next().ok_or_else(malformed)?;
        let identity = parts.next().ok_or_else(malformed)?;

        let timestamp = timestamp.parse::<u64>().map_err(|_| malformed())?;

        Ok(Self::new(identity, timestamp, tag))
    }

    /// Seconds elapsed since issue. Future timestamps count as zero.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    /// Whether the challenge is at most `window_secs` old.
    pub fn is_fresh(&self, now: u64, window_secs: u64) -> bool {
        self.age(now) <= window_secs
    }
}

impl fmt::Display for OwnershipChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.identity, self.timestamp, self.tag)
    }
}

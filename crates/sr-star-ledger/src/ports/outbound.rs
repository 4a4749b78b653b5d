//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the star ledger service.

use sr_signature_verification::SignatureError;

/// Abstract clock.
///
/// Production: [`SystemTimeSource`](crate::adapters::SystemTimeSource)
/// Testing: [`ManualTimeSource`](crate::adapters::ManualTimeSource)
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in seconds since epoch.
    fn now(&self) -> u64;
}

/// Proof-of-ownership check for a signed challenge.
///
/// Production: [`WalletOwnershipVerifier`](crate::adapters::WalletOwnershipVerifier)
pub trait OwnershipVerifier: Send + Sync {
    /// `Ok(())` iff `signature` over `message` was produced by the key behind `identity`.
    fn verify_ownership(
        &self,
        identity: &str,
        message: &str,
        signature: &str,
    ) -> Result<(), SignatureError>;
}

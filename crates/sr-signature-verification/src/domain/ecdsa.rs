//! # Wallet Message Verification (secp256k1)
//!
//! Pure domain logic for verifying that a wallet address signed a text
//! message with `personal_sign` (EIP-191 version `0x45`).
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be STRICTLY LESS THAN SECP256K1_HALF_ORDER
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **Constant-Time Operations**: Uses `subtle` crate for scalar comparisons
//! - Uses k256 crate for public-key recovery

use super::entities::{Address, Hash, WalletSignature};
use super::errors::SignatureError;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use subtle::{Choice, ConstantTimeEq};

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (for malleability check).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Prefix wallets prepend before hashing a personal message.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

// =============================================================================
// WALLET VERIFIER
// =============================================================================

/// Stateless verifier for wallet-signed messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletVerifier;

impl WalletVerifier {
    /// Create a new wallet verifier.
    pub fn new() -> Self {
        Self
    }

    /// Check that `signature` over `message` was produced by `address`.
    pub fn verify_message(
        &self,
        address: &str,
        message: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        verify_message(address, message, signature)
    }
}

// =============================================================================
// CORE VERIFICATION FUNCTIONS
// =============================================================================

/// Verify a hex signature over a text message against a hex address.
///
/// The claimed address and signature are parsed first, so malformed input
/// is reported before any curve arithmetic happens.
pub fn verify_message(address: &str, message: &str, signature: &str) -> Result<(), SignatureError> {
    let expected = super::entities::parse_address(address)?;
    let signature = WalletSignature::from_hex(signature)?;
    let message_hash = personal_message_hash(message.as_bytes());

    let actual = recover_address(&message_hash, &signature)?;
    if actual[..].ct_eq(&expected[..]).into() {
        Ok(())
    } else {
        tracing::debug!(
            "[sr-sig] signer mismatch: claimed 0x{}, recovered 0x{}",
            hex::encode(expected),
            hex::encode(actual)
        );
        Err(SignatureError::SignerMismatch { expected, actual })
    }
}

/// Recover the signer's address from a prehashed message.
///
/// Security validations performed:
/// 1. R and S are in valid range [1, n-1]
/// 2. S is in lower half per EIP-2 malleability protection
/// 3. Recovery ID (v) is valid (0, 1, 27, or 28)
/// 4. Public key recovery succeeds
pub fn recover_address(
    message_hash: &Hash,
    signature: &WalletSignature,
) -> Result<Address, SignatureError> {
    check_scalars(&signature.r, &signature.s)?;
    let recovery_id = parse_recovery_id(signature.v)?;
    let recovered_key = recover_key(message_hash, &signature.r, &signature.s, recovery_id)?;

    Ok(address_from_pubkey(&recovered_key))
}

/// Reject out-of-range scalars and high S values.
pub(crate) fn check_scalars(r: &[u8; 32], s: &[u8; 32]) -> Result<(), SignatureError> {
    if !is_valid_scalar(r) || !is_valid_scalar(s) {
        return Err(SignatureError::InvalidFormat);
    }

    if !is_low_s(s) {
        return Err(SignatureError::MalleableSignature);
    }

    Ok(())
}

/// Recover the public key behind `r || s` over a prehashed message.
///
/// Callers run [`check_scalars`] first.
pub(crate) fn recover_key(
    message_hash: &Hash,
    r: &[u8; 32],
    s: &[u8; 32],
    recovery_id: RecoveryId,
) -> Result<VerifyingKey, SignatureError> {
    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(r);
    sig_bytes[32..].copy_from_slice(s);
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| SignatureError::InvalidFormat)?;

    VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Hash a message the way wallets do for `personal_sign`:
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`.
pub fn personal_message_hash(message: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Derive Ethereum address from public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);
    let pubkey_slice = pubkey_bytes.as_bytes();

    // Keccak256 hash of public key (without 0x04 prefix)
    let hash = keccak256(&pubkey_slice[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Constant-time `a < b` over big-endian 32-byte integers.
fn ct_less_than(a: &[u8; 32], b: &[u8; 32]) -> Choice {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((a[i] < b[i]) as u8);
        let byte_greater = Choice::from((a[i] > b[i]) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    less
}

/// Check if S value is in lower half of curve order (EIP-2, strict inequality).
fn is_low_s(s: &[u8; 32]) -> bool {
    ct_less_than(s, &SECP256K1_HALF_ORDER).into()
}

/// Check if a scalar value is in valid range [1, n-1].
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for &byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    (!is_zero & ct_less_than(scalar, &SECP256K1_ORDER)).into()
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

/// Invert S value: s' = n - s
pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Key generation and wallet-style signing, for tests in this and dependent crates.
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use super::*;
    use k256::ecdsa::SigningKey;

    /// Generate a new ECDSA keypair.
    pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let verifying_key = *signing_key.verifying_key();
        (signing_key, verifying_key)
    }

    /// Sign a prehashed message, normalized to low S with `v` in {27, 28}.
    ///
    /// # Panics
    ///
    /// Panics if k256 cannot produce a signature for `message_hash`, which
    /// only happens for a degenerate nonce. Test-only; never call it from
    /// request handling.
    pub fn sign_prehash(message_hash: &Hash, private_key: &SigningKey) -> WalletSignature {
        let (sig, recid) = private_key
            .sign_prehash_recoverable(message_hash)
            .expect("signing failed");

        let sig_bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[..32]);
        s.copy_from_slice(&sig_bytes[32..]);

        let s_normalized = if !is_low_s(&s) { invert_s(&s) } else { s };

        let v = if s_normalized != s {
            // S was inverted, flip recovery id
            if recid.to_byte() == 0 {
                28
            } else {
                27
            }
        } else {
            recid.to_byte() + 27
        };

        WalletSignature {
            r,
            s: s_normalized,
            v,
        }
    }

    /// Sign a text message the way a wallet's `personal_sign` does; returns hex.
    pub fn sign_message(message: &str, private_key: &SigningKey) -> String {
        sign_prehash(&personal_message_hash(message.as_bytes()), private_key).to_hex()
    }

    /// `0x`-prefixed address of a signing key.
    pub fn address_of(private_key: &SigningKey) -> String {
        crate::domain::entities::format_address(&address_from_pubkey(private_key.verifying_key()))
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================

//! Fuzz target for wallet message verification (both schemes).
//!
//! ## Running
//!
//! ```bash
//! cd crates/sr-signature-verification
//! cargo +nightly fuzz run fuzz_verify_message
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use sr_signature_verification::{
    recover_address, recover_pubkey_hash, BitcoinMessageVerifier, CompactSignature,
    WalletSignature, WalletVerifier,
};

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    address: String,
    message: String,
    signature: String,
    raw_hash: [u8; 32],
    raw_signature: [u8; 65],
}

fuzz_target!(|input: FuzzInput| {
    let verifier = WalletVerifier::new();

    // Must never panic on arbitrary strings
    let first = verifier.verify_message(&input.address, &input.message, &input.signature);
    let second = verifier.verify_message(&input.address, &input.message, &input.signature);
    assert_eq!(first, second);

    let bitcoin = BitcoinMessageVerifier::new();
    let _ = bitcoin.verify_message(&input.address, &input.message, &input.signature);

    if let Ok(signature) = WalletSignature::from_bytes(&input.raw_signature) {
        let _ = recover_address(&input.raw_hash, &signature);
    }
    if let Ok(signature) = CompactSignature::from_bytes(&input.raw_signature) {
        let _ = recover_pubkey_hash(&input.raw_hash, &signature);
    }
});

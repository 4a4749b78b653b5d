//! # Integration Test Flows
//!
//! Exercises the full ownership protocol with real wallet signatures:
//!
//! 1. **Challenge → Sign → Submit**: a wallet registers stars through the ledger
//! 2. **Tamper Detection**: a forged block freezes submissions
//! 3. **Concurrent Writers**: many wallets submit at once and heights stay contiguous
//! 4. **Node Protocol**: the same flow driven through JSON request lines

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use node_runtime::{handle_line, serve, Response};
    use sr_signature_verification::test_helpers::{
        address_of, bitcoin_address_of, generate_keypair, sign_bitcoin_message, sign_message,
    };
    use sr_signature_verification::{verify_bitcoin_message, verify_message, SignatureError};
    use sr_star_ledger::{
        Block, LedgerConfig, LedgerDependencies, LedgerError, ManualTimeSource, SignatureScheme,
        StarEntry, StarRegistryApi, StarRegistryService, WalletOwnershipVerifier,
        WalletStarRegistry,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const T0: u64 = 1_700_000_000;

    type TestLedger = StarRegistryService<Arc<ManualTimeSource>, WalletOwnershipVerifier>;

    fn make_ledger() -> (TestLedger, Arc<ManualTimeSource>) {
        make_ledger_with(SignatureScheme::Ethereum)
    }

    fn make_ledger_with(scheme: SignatureScheme) -> (TestLedger, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(T0));
        let deps = LedgerDependencies {
            time_source: clock.clone(),
            verifier: WalletOwnershipVerifier::new(scheme),
        };
        let ledger = StarRegistryService::new(deps, LedgerConfig::default()).unwrap();
        (ledger, clock)
    }

    /// A wallet with a key and its address in one signing scheme.
    struct Wallet {
        key: k256::ecdsa::SigningKey,
        scheme: SignatureScheme,
        address: String,
    }

    impl Wallet {
        /// An EIP-191 wallet.
        fn new() -> Self {
            Self::with_scheme(SignatureScheme::Ethereum)
        }

        fn bitcoin() -> Self {
            Self::with_scheme(SignatureScheme::Bitcoin)
        }

        fn with_scheme(scheme: SignatureScheme) -> Self {
            let (key, _) = generate_keypair();
            let address = match scheme {
                SignatureScheme::Bitcoin => bitcoin_address_of(&key),
                SignatureScheme::Ethereum => address_of(&key),
            };
            Self {
                key,
                scheme,
                address,
            }
        }

        fn sign(&self, message: &str) -> String {
            match self.scheme {
                SignatureScheme::Bitcoin => sign_bitcoin_message(message, &self.key),
                SignatureScheme::Ethereum => sign_message(message, &self.key),
            }
        }

        fn register<A: StarRegistryApi + ?Sized>(&self, ledger: &A, star: Value) -> Block {
            let challenge = ledger.request_ownership_challenge(&self.address);
            let signature = self.sign(&challenge);
            ledger
                .submit_entry(&self.address, &challenge, &signature, star)
                .unwrap()
        }
    }

    fn ok_result(response: Response) -> Value {
        match response {
            Response::Success { ok: true, result } => result,
            other => panic!("expected success, got {:?}", other),
        }
    }

    // =============================================================================
    // CHALLENGE → SIGN → SUBMIT
    // =============================================================================

    #[test]
    fn test_wallet_registers_stars() {
        let (ledger, clock) = make_ledger();
        let alice = Wallet::new();
        let bob = Wallet::new();

        let first = alice.register(&ledger, json!({"name": "Polaris"}));
        clock.advance(10);
        bob.register(&ledger, json!({"name": "Vega"}));
        clock.advance(10);
        let third = alice.register(&ledger, json!({"name": "Sirius"}));

        assert_eq!(first.height, 1);
        assert_eq!(third.height, 3);
        assert_eq!(third.time, T0 + 20);
        assert_eq!(ledger.get_height(), 4);
        assert_eq!(ledger.tip_height(), 3);

        let alice_stars: Vec<Value> = ledger
            .list_entries_by_identity(&alice.address)
            .into_iter()
            .map(|entry| entry.star)
            .collect();
        assert_eq!(
            alice_stars,
            vec![json!({"name": "Polaris"}), json!({"name": "Sirius"})]
        );
        assert_eq!(ledger.list_entries_by_identity(&bob.address).len(), 1);
        assert!(ledger.validate().unwrap().is_empty());
    }

    #[test]
    fn test_challenge_verifies_outside_ledger() {
        let (ledger, _) = make_ledger();
        let wallet = Wallet::new();

        let challenge = ledger.request_ownership_challenge(&wallet.address);
        assert_eq!(challenge, format!("{}:{}:starRegistry", wallet.address, T0));

        let signature = sign_message(&challenge, &wallet.key);
        assert_eq!(verify_message(&wallet.address, &challenge, &signature), Ok(()));
    }

    #[test]
    fn test_replayed_signature_for_other_identity_rejected() {
        let (ledger, _) = make_ledger();
        let alice = Wallet::new();
        let mallory = Wallet::new();

        let challenge = ledger.request_ownership_challenge(&alice.address);
        let signature = sign_message(&challenge, &alice.key);

        let result = ledger.submit_entry(&mallory.address, &challenge, &signature, json!(1));
        assert!(matches!(
            result,
            Err(LedgerError::InvalidSignature(SignatureError::SignerMismatch { .. }))
        ));
        assert_eq!(ledger.get_height(), 1);
    }

    #[test]
    fn test_stale_challenge_needs_reissue() {
        let (ledger, clock) = make_ledger();
        let wallet = Wallet::new();

        let stale = ledger.request_ownership_challenge(&wallet.address);
        let stale_signature = sign_message(&stale, &wallet.key);
        clock.advance(301);

        let err = ledger
            .submit_entry(&wallet.address, &stale, &stale_signature, json!(1))
            .unwrap_err();
        assert!(err.is_retryable());

        let block = wallet.register(&ledger, json!(1));
        assert_eq!(block.height, 1);
    }

    #[test]
    fn test_entries_decode_from_blocks() {
        let (ledger, _) = make_ledger();
        let wallet = Wallet::new();
        let star = json!({"dec": "68° 52' 56.9", "ra": "16h 29m 1.0s", "story": "Found star using https://www.google.com/sky/"});

        let block = wallet.register(&ledger, star.clone());
        let stored = ledger.find_by_hash(block.hash.as_deref().unwrap()).unwrap();

        assert_eq!(
            stored.decode_payload::<StarEntry>().unwrap(),
            StarEntry {
                address: wallet.address.clone(),
                star,
            }
        );
        assert_eq!(
            ledger.find_by_height(0).unwrap().decode_payload::<Value>(),
            Err(LedgerError::GenesisBlock)
        );
    }

    #[test]
    fn test_production_wiring_accepts_bitcoin_wallets() {
        let ledger = WalletStarRegistry::with_wallet_verifier(LedgerConfig::default()).unwrap();
        let wallet = Wallet::bitcoin();

        let block = wallet.register(&ledger, json!({"name": "Deneb"}));
        assert_eq!(block.height, 1);
        assert!(ledger.validate().unwrap().is_empty());

        let eip191 = Wallet::new();
        let challenge = ledger.request_ownership_challenge(&eip191.address);
        let result = ledger.submit_entry(&eip191.address, &challenge, &eip191.sign(&challenge), json!(1));
        assert!(matches!(
            result,
            Err(LedgerError::InvalidSignature(SignatureError::InvalidAddress(_)))
        ));
    }

    #[test]
    fn test_production_wiring_with_ethereum_scheme() {
        let config = LedgerConfig {
            signature_scheme: SignatureScheme::Ethereum,
            ..LedgerConfig::default()
        };
        let ledger = WalletStarRegistry::with_wallet_verifier(config).unwrap();

        let block = Wallet::new().register(&ledger, json!({"name": "Deneb"}));
        assert_eq!(block.height, 1);
    }

    #[test]
    fn test_bitcoin_wallets_register_stars() {
        let (ledger, clock) = make_ledger_with(SignatureScheme::Bitcoin);
        let alice = Wallet::bitcoin();
        let bob = Wallet::bitcoin();

        let challenge = ledger.request_ownership_challenge(&alice.address);
        assert_eq!(verify_bitcoin_message(&alice.address, &challenge, &alice.sign(&challenge)), Ok(()));

        alice.register(&ledger, json!({"name": "Polaris"}));
        clock.advance(60);
        bob.register(&ledger, json!({"name": "Vega"}));

        assert_eq!(ledger.list_entries_by_identity(&alice.address).len(), 1);
        assert_eq!(ledger.list_entries_by_identity(&bob.address).len(), 1);

        let forged = ledger.request_ownership_challenge(&alice.address);
        let result = ledger.submit_entry(&alice.address, &forged, &bob.sign(&forged), json!(3));
        assert!(matches!(
            result,
            Err(LedgerError::InvalidSignature(SignatureError::SignerMismatch { .. }))
        ));
        assert_eq!(ledger.get_height(), 3);
    }

    // =============================================================================
    // TAMPER DETECTION
    // =============================================================================

    #[test]
    fn test_chain_without_tampering_validates_after_many_appends() {
        let (ledger, clock) = make_ledger();
        let wallet = Wallet::new();
        for i in 0..20 {
            wallet.register(&ledger, json!(i));
            clock.advance(1);
        }

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.len(), 21);
        for pair in snapshot.windows(2) {
            assert_eq!(pair[1].previous_block_hash, pair[0].hash);
        }
        assert!(ledger.validate().unwrap().is_empty());
    }

    #[test]
    fn test_raw_append_does_not_break_chain() {
        let (ledger, _) = make_ledger();
        let appended = ledger
            .append(Block::new(&json!({"note": "operator entry"})).unwrap())
            .unwrap();

        assert_eq!(appended.height, 1);
        assert!(ledger.validate().unwrap().is_empty());
        assert!(ledger.list_entries_by_identity("operator").is_empty());
    }

    // =============================================================================
    // CONCURRENT WRITERS
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_wallets() {
        const WALLETS: usize = 16;
        let (ledger, _) = make_ledger();
        let ledger = Arc::new(ledger);

        let handles: Vec<_> = (0..WALLETS)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                tokio::task::spawn_blocking(move || {
                    let wallet = Wallet::new();
                    let block = wallet.register(ledger.as_ref(), json!({"index": i}));
                    (wallet.address, block.height)
                })
            })
            .collect();

        let mut heights = Vec::with_capacity(WALLETS);
        for handle in handles {
            let (address, height) = handle.await.unwrap();
            assert_eq!(ledger.list_entries_by_identity(&address).len(), 1);
            heights.push(height);
        }
        heights.sort_unstable();

        assert_eq!(heights, (1..=WALLETS as u64).collect::<Vec<_>>());
        assert_eq!(ledger.get_height(), WALLETS as u64 + 1);
        assert!(ledger.validate().unwrap().is_empty());
    }

    // =============================================================================
    // NODE PROTOCOL
    // =============================================================================

    #[test]
    fn test_request_lines_drive_ledger() {
        let (ledger, _) = make_ledger();
        let wallet = Wallet::new();

        let challenge = ok_result(handle_line(
            &ledger,
            &json!({"command": "request_challenge", "address": wallet.address}).to_string(),
        ));
        let challenge = challenge.as_str().unwrap().to_string();

        let submit = json!({
            "command": "submit_star",
            "address": wallet.address,
            "message": challenge,
            "signature": sign_message(&challenge, &wallet.key),
            "star": {"name": "Altair"},
        });
        let block = ok_result(handle_line(&ledger, &submit.to_string()));
        assert_eq!(block["height"], json!(1));
        assert_eq!(block["previousBlockHash"], json!(ledger.find_by_height(0).unwrap().hash));

        let height = ok_result(handle_line(&ledger, r#"{"command":"height"}"#));
        assert_eq!(height, json!(2));

        let stars = ok_result(handle_line(
            &ledger,
            &json!({"command": "stars_by_address", "address": wallet.address}).to_string(),
        ));
        assert_eq!(stars, json!([{"address": wallet.address, "star": {"name": "Altair"}}]));

        let problems = ok_result(handle_line(&ledger, r#"{"command":"validate"}"#));
        assert_eq!(problems, json!([]));
    }

    #[test]
    fn test_rejected_request_line_leaves_chain() {
        let (ledger, _) = make_ledger();
        let wallet = Wallet::new();
        let challenge = ledger.request_ownership_challenge(&wallet.address);

        let submit = json!({
            "command": "submit_star",
            "address": wallet.address,
            "message": challenge,
            "signature": format!("0x{}", "00".repeat(65)),
            "star": 1,
        });
        let response = handle_line(&ledger, &submit.to_string());

        assert!(!response.is_ok());
        assert_eq!(ledger.get_height(), 1);
    }

    #[tokio::test]
    async fn test_served_stream_survives_garbage_bytes() {
        let (ledger, _) = make_ledger_with(SignatureScheme::Bitcoin);
        let ledger = Arc::new(ledger);
        let wallet = Wallet::bitcoin();
        let challenge = ledger.request_ownership_challenge(&wallet.address);

        let mut input = b"\xc3\x28 not utf-8\n".to_vec();
        let submit = json!({
            "command": "submit_star",
            "address": wallet.address,
            "message": challenge,
            "signature": wallet.sign(&challenge),
            "star": {"name": "Capella"},
        });
        input.extend_from_slice(submit.to_string().as_bytes());
        input.push(b'\n');

        let mut output = Vec::new();
        serve(Arc::clone(&ledger), input.as_slice(), &mut output).await.unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["ok"], json!(false));
        assert_eq!(responses[1]["ok"], json!(true));
        assert_eq!(responses[1]["result"]["height"], json!(1));
        assert_eq!(ledger.list_entries_by_identity(&wallet.address).len(), 1);
    }
}

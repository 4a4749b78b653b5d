//! # Star Ledger Benchmarks
//!
//! Append, validation and lookup are linear scans or full re-hashes; these
//! benchmarks track how they grow with chain length.

use criterion::{black_box, BenchmarkId, Criterion};
use serde_json::json;
use sr_signature_verification::test_helpers::{address_of, generate_keypair, sign_message};
use sr_star_ledger::{
    Block, LedgerConfig, LedgerDependencies, ManualTimeSource, StarRegistryApi,
    StarRegistryService, WalletOwnershipVerifier,
};

type BenchLedger = StarRegistryService<ManualTimeSource, WalletOwnershipVerifier>;

const CHAIN_LENGTHS: [usize; 3] = [10, 100, 1000];

fn ledger_with(blocks: usize) -> BenchLedger {
    let deps = LedgerDependencies {
        time_source: ManualTimeSource::new(1_700_000_000),
        verifier: WalletOwnershipVerifier::ethereum(),
    };
    let ledger = StarRegistryService::new(deps, LedgerConfig::default())
        .expect("ledger bootstrap");
    for i in 0..blocks {
        let entry = json!({"address": format!("0x{}", hex::encode([i as u8; 20])), "star": {"i": i}});
        ledger
            .append(Block::new(&entry).expect("encode"))
            .expect("append");
    }
    ledger
}

pub fn bench_block_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("sr-ledger-block");

    let mut block = Block::new(&json!({"address": "0xabc", "star": {"story": "x".repeat(500)}}))
        .expect("encode");
    block.height = 42;
    block.time = 1_700_000_000;
    block.previous_block_hash = Some("ab".repeat(32));
    block.hash = Some(block.compute_hash().expect("hash"));

    group.bench_function("compute_hash", |b| b.iter(|| black_box(block.compute_hash())));
    group.bench_function("validate", |b| b.iter(|| black_box(block.validate())));

    group.finish();
}

pub fn bench_chain_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("sr-ledger-chain");

    for len in CHAIN_LENGTHS {
        let ledger = ledger_with(len);
        let last_hash = ledger
            .find_by_height(len as u64)
            .and_then(|b| b.hash)
            .expect("tip hash");

        group.bench_with_input(BenchmarkId::new("validate", len), &ledger, |b, l| {
            b.iter(|| black_box(l.validate()))
        });
        group.bench_with_input(BenchmarkId::new("find_by_hash_tip", len), &ledger, |b, l| {
            b.iter(|| black_box(l.find_by_hash(&last_hash)))
        });
        group.bench_with_input(BenchmarkId::new("list_entries", len), &ledger, |b, l| {
            b.iter(|| black_box(l.list_entries_by_identity("0x00")))
        });
    }

    group.finish();
}

pub fn bench_submit_entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("sr-ledger-submit");
    group.sample_size(20);

    for len in CHAIN_LENGTHS {
        let ledger = ledger_with(len);
        let (key, _) = generate_keypair();
        let address = address_of(&key);
        let challenge = ledger.request_ownership_challenge(&address);
        let signature = sign_message(&challenge, &key);

        // Each submission grows the chain; the series measures the validate-first cost.
        group.bench_with_input(BenchmarkId::new("submit_signed", len), &ledger, |b, l| {
            b.iter(|| {
                black_box(l.submit_entry(&address, &challenge, &signature, json!({"name": "bench"})))
            })
        });
    }

    group.finish();
}

// Target search ordering tests
// The search must return the first passing nonce and never a hash above target

use bitcoin::block::Header;
use bitcoin::{Amount, CompactTarget, Target};
use kindcoin_rust::genesis::pow::meets_target;
use kindcoin_rust::genesis::{create_genesis_block, hash_to_target, search, SearchControl};

const GENESIS_TIME: u32 = 1_736_503_869;

fn draft(bits: u32) -> Header {
    create_genesis_block(
        GENESIS_TIME,
        0,
        CompactTarget::from_consensus(bits),
        1,
        Amount::ZERO,
    )
    .unwrap()
    .header
}

fn assert_minimal(bits: u32) -> u32 {
    let header = draft(bits);
    let target = Target::from_compact(header.bits);
    let outcome = search(header.bits, &header, &SearchControl::new()).unwrap();

    assert_eq!(outcome.time, GENESIS_TIME);
    assert!(hash_to_target(&outcome.hash) <= target);
    assert_eq!(outcome.attempts, outcome.nonce as u64 + 1);

    let mut found = header;
    found.nonce = outcome.nonce;
    assert!(meets_target(&found, &target).unwrap());

    // Every earlier nonce at the same time fails
    for nonce in 0..outcome.nonce {
        let mut earlier = header;
        earlier.nonce = nonce;
        assert!(!meets_target(&earlier, &target).unwrap(), "nonce {} should fail", nonce);
    }

    outcome.nonce
}

#[test]
fn test_search_returns_first_passing_nonce() {
    assert_eq!(assert_minimal(0x200fffff), 27);
    assert_eq!(assert_minimal(0x2000ffff), 44);
}

#[test]
fn test_search_is_reproducible() {
    let header = draft(0x200fffff);
    let first = search(header.bits, &header, &SearchControl::new()).unwrap();
    let second = search(header.bits, &header, &SearchControl::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_search_uses_bits_argument() {
    // Draft carries a hard target, the bits argument decides
    let header = draft(0x1f00ffff);
    let outcome = search(
        CompactTarget::from_consensus(0x207fffff),
        &header,
        &SearchControl::new(),
    )
    .unwrap();
    assert_eq!(outcome.nonce, 0);
}

/// Slow in debug builds: several thousand scrypt hashes
#[test]
#[ignore]
fn test_search_recovers_testnet_nonce() {
    let header = draft(0x1f00ffff);
    let outcome = search(header.bits, &header, &SearchControl::new()).unwrap();

    assert_eq!(outcome.nonce, 7048);
    assert_eq!(
        outcome.hash.to_string(),
        "0000ab09572ccda6fc69e6aebce56316efc11b33245594aac80b1257c0f254ce"
    );
}

#![no_main]

use cachesim::ds::FrequencyIndex;
use libfuzzer_sys::fuzz_target;

// Fuzz property-based tests for FrequencyIndex
//
// Tests specific invariants and properties:
// - Frequency monotonicity (touch always increments)
// - LRU ordering within a frequency tier
// - min_freq accuracy against a full recount
// - Peek/pop consistency
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    match data[0] % 4 {
        0 => frequency_monotonicity(&data[1..]),
        1 => lru_within_tier(&data[1..]),
        2 => min_freq_accuracy(&data[1..]),
        3 => peek_pop_consistency(&data[1..]),
        _ => unreachable!(),
    }
});

// Property: touch() increments the frequency by exactly 1
fn frequency_monotonicity(data: &[u8]) {
    let mut index: FrequencyIndex<u32> = FrequencyIndex::new();

    for &byte in data {
        let key = u32::from(byte);
        if !index.contains(&key) {
            index.insert(key);
            assert_eq!(index.frequency(&key), Some(1));
        }

        let before = index.frequency(&key).unwrap();
        let after = index.touch(&key).unwrap();
        assert_eq!(after, before + 1);
        index.debug_validate_invariants();
    }
}

// Property: keys at the same frequency pop in insertion order
fn lru_within_tier(data: &[u8]) {
    let mut index: FrequencyIndex<u32> = FrequencyIndex::new();

    let mut inserted = Vec::new();
    for &byte in data {
        let key = u32::from(byte);
        if index.insert(key) {
            inserted.push(key);
        }
    }

    for expected in inserted {
        assert_eq!(index.pop_min(), Some((expected, 1)));
    }
    assert!(index.is_empty());
}

// Property: min_freq always matches a full recount
fn min_freq_accuracy(data: &[u8]) {
    let mut index: FrequencyIndex<u32> = FrequencyIndex::new();

    for chunk in data.chunks(2) {
        if chunk.len() < 2 {
            break;
        }
        let key = u32::from(chunk[1]);
        if chunk[0] % 2 == 0 {
            index.insert(key);
        } else {
            index.touch(&key);
        }

        let recount = index.iter().map(|(_, freq)| freq).min();
        assert_eq!(index.min_freq(), recount);
        index.debug_validate_invariants();
    }
}

// Property: peek_min and pop_min agree on the candidate
fn peek_pop_consistency(data: &[u8]) {
    let mut index: FrequencyIndex<u32> = FrequencyIndex::new();

    for &byte in data.iter().take(32) {
        index.insert(u32::from(byte));
    }
    for &byte in data.iter().skip(32) {
        index.touch(&u32::from(byte));
    }

    while !index.is_empty() {
        let peeked = index.peek_min().map(|(key, freq)| (*key, freq));
        let popped = index.pop_min();
        assert_eq!(peeked, popped);
        index.debug_validate_invariants();
    }

    assert_eq!(index.peek_min(), None);
    assert_eq!(index.pop_min(), None);
}

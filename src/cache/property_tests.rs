//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache's correctness properties over arbitrary
//! text, payloads and operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{
    derive_key, CacheStore, Clock, ManualClock, CACHE_NAMESPACE, DEFAULT_TTL_MS,
};
use crate::storage::{KeyValueStorage, MemoryStorage};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 50;
const START: u64 = 1_700_000_000_000;

fn test_store(max_entries: usize) -> (CacheStore<MemoryStorage, ManualClock>, ManualClock) {
    let clock = ManualClock::new(START);
    let store = CacheStore::with_clock(MemoryStorage::new(), clock.clone(), max_entries, DEFAULT_TTL_MS);
    (store, clock)
}

// == Strategies ==
/// Indonesian or Arabic looking source text, including empty strings
fn source_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ,.?]{0,64}",
        "[\u{0621}-\u{064A}\u{064B}-\u{0652} ]{0,32}",
    ]
}

/// Base64-like payloads
fn payload_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9+/]{1,128}={0,2}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { text: String, payload: String },
    Get { text: String },
    Advance { ms: u64 },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (source_text_strategy(), payload_strategy())
            .prop_map(|(text, payload)| CacheOp::Put { text, payload }),
        4 => source_text_strategy().prop_map(|text| CacheOp::Get { text }),
        2 => (0..DEFAULT_TTL_MS / 2).prop_map(|ms| CacheOp::Advance { ms }),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Key derivation is a pure function of the text
    #[test]
    fn prop_key_is_deterministic(text in source_text_strategy()) {
        let first = derive_key(&text);
        let second = derive_key(&text.clone());
        prop_assert_eq!(&first, &second);
        prop_assert!(first.starts_with(CACHE_NAMESPACE));
        prop_assert!(first[CACHE_NAMESPACE.len()..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    // A put is immediately readable back
    #[test]
    fn prop_roundtrip(text in source_text_strategy(), payload in payload_strategy()) {
        let (mut store, _) = test_store(TEST_MAX_ENTRIES);

        store.put(&text, &payload);

        prop_assert_eq!(store.get(&text), Some(payload));
    }

    // The second put for the same text wins
    #[test]
    fn prop_overwrite_semantics(
        text in source_text_strategy(),
        first in payload_strategy(),
        second in payload_strategy()
    ) {
        let (mut store, clock) = test_store(TEST_MAX_ENTRIES);

        store.put(&text, &first);
        clock.advance(1);
        store.put(&text, &second);

        prop_assert_eq!(store.get(&text), Some(second));
        prop_assert_eq!(store.stats().count, 1);
    }

    // Anything older than the TTL is gone, and gone from storage too
    #[test]
    fn prop_ttl_expiration(
        text in source_text_strategy(),
        payload in payload_strategy(),
        extra in 1u64..1_000_000
    ) {
        let (mut store, clock) = test_store(TEST_MAX_ENTRIES);
        store.put(&text, &payload);

        clock.advance(DEFAULT_TTL_MS + extra);

        prop_assert!(store.get(&text).is_none());
        prop_assert!(store.storage().get(&derive_key(&text)).unwrap().is_none());
    }

    // A write at capacity is readable even when every entry shares its timestamp
    #[test]
    fn prop_put_survives_same_millisecond_eviction(
        texts in prop::collection::vec("[a-z]{1,12}", 1..20),
        max_entries in 1usize..5
    ) {
        let (mut store, _) = test_store(max_entries);

        for text in texts {
            store.put(&text, "payload");
            let got = store.get(&text);
            prop_assert_eq!(got.as_deref(), Some("payload"));
            prop_assert!(store.stats().count <= max_entries);
        }
    }

    // N + k distinct writes leave exactly the N newest
    #[test]
    fn prop_capacity_keeps_newest(
        texts in prop::collection::hash_set("[a-z]{1,12}", 1..40),
        max_entries in 1usize..10
    ) {
        let (mut store, clock) = test_store(max_entries);
        let mut by_key: HashMap<String, String> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for text in texts {
            let key = derive_key(&text);
            if by_key.contains_key(&key) {
                continue; // skip colliding inputs, they share one slot
            }
            store.put(&text, "payload");
            clock.advance(1);
            by_key.insert(key, text.clone());
            order.push(text);
        }

        let expected: Vec<&String> = order.iter().rev().take(max_entries).collect();
        prop_assert_eq!(store.stats().count, expected.len());
        for text in expected {
            prop_assert!(store.get(text).is_some(), "newest entry {} was evicted", text);
        }
    }

    // Arbitrary sequences agree with a simple model and never exceed capacity
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let max_entries = 5;
        let (mut store, clock) = test_store(max_entries);
        // key -> (text, payload, created_at)
        let mut model: HashMap<String, (String, String, u64)> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Put { text, payload } => {
                    store.put(&text, &payload);
                    let written = derive_key(&text);
                    model.insert(written.clone(), (text, payload, clock.now_ms()));
                    if model.len() > max_entries {
                        let mut aged: Vec<(String, u64)> =
                            model.iter().map(|(k, v)| (k.clone(), v.2)).collect();
                        // Oldest first; the entry just written loses every tie
                        aged.sort_by_key(|(k, created)| (*created, *k == written, k.clone()));
                        let excess = aged.len() - max_entries;
                        for (key, _) in aged.into_iter().take(excess) {
                            model.remove(&key);
                        }
                    }
                }
                CacheOp::Get { text } => {
                    let key = derive_key(&text);
                    let expired = model
                        .get(&key)
                        .is_some_and(|(_, _, created)| clock.now_ms() - created > DEFAULT_TTL_MS);
                    if expired {
                        model.remove(&key);
                    }
                    let expected = model
                        .get(&key)
                        .filter(|(stored, _, _)| *stored == text)
                        .map(|(_, payload, _)| payload.clone());
                    prop_assert_eq!(store.get(&text), expected);
                }
                CacheOp::Advance { ms } => clock.advance(ms),
                CacheOp::Clear => {
                    store.clear();
                    model.clear();
                }
            }

            prop_assert!(store.stats().count <= max_entries);
            prop_assert_eq!(store.stats().count, model.len());
        }
    }
}

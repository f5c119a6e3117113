//! Property-Based Tests for Cache Module
//!
//! Uses proptest with a manual clock so expiration is deterministic.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::cache::{CacheEntryStore, Cacheable, Expiring, Hit, ManualClock};

// == Test Configuration ==
const TEST_TTL_MS: u64 = 1_000;

// == Fixtures ==
#[derive(Debug, Clone)]
struct Counter {
    key: String,
    expires_at: u64,
    refreshes: u32,
}

impl Expiring for Counter {
    fn expiration(&self) -> u64 {
        self.expires_at
    }
}

impl Cacheable for Counter {
    fn key(&self) -> &str {
        &self.key
    }

    fn set_expiration(&mut self, expires_at: u64) {
        self.expires_at = expires_at;
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

type TestStore = CacheEntryStore<Counter, String, ManualClock>;

fn new_store(max_entries: i64) -> (TestStore, ManualClock) {
    let clock = ManualClock::new(0);
    let store = CacheEntryStore::with_clock("props", clock.clone())
        .with_ttl_ms(TEST_TTL_MS)
        .with_max_entries(max_entries);
    (store, clock)
}

// == Strategies ==
/// Generates valid cache keys (non-empty)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,16}".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}".prop_map(|s| s)
}

/// Generic inserts paired with the clock offset (ms) they happen at
fn timed_inserts_strategy() -> impl Strategy<Value = Vec<(String, String, u64)>> {
    prop::collection::vec(
        (valid_key_strategy(), valid_value_strategy(), 0u64..3_000),
        1..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Insert-then-get returns the payload before expiration.
    #[test]
    fn prop_generic_insert_then_get(key in valid_key_strategy(), value in valid_value_strategy()) {
        let (mut store, clock) = new_store(0);

        store.insert_generic(value.clone(), key.clone());
        clock.advance(TEST_TTL_MS);

        let retrieved = store.get(&key).and_then(Hit::generic).cloned();
        prop_assert_eq!(retrieved, Some(value));
    }

    // Overwrite returns the key and keeps a single entry.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let (mut store, _clock) = new_store(0);

        prop_assert_eq!(store.insert_generic(value1, key.clone()), None);
        prop_assert_eq!(store.insert_generic(value2.clone(), key.clone()), Some(key.clone()));

        prop_assert_eq!(store.get(&key).and_then(Hit::generic).cloned(), Some(value2));
        prop_assert_eq!(store.count_elements(), 1);
    }

    // Sweep removes exactly the entries whose expiration is in the past,
    // and the hint names the survivor expiring first.
    #[test]
    fn prop_sweep_removes_all_and_only_expired(
        inserts in timed_inserts_strategy(),
        sweep_at in 0u64..5_000
    ) {
        let (mut store, clock) = new_store(0);
        let mut expirations: HashMap<String, u64> = HashMap::new();

        let mut ordered = inserts;
        ordered.sort_by_key(|(_, _, at)| *at);
        for (key, value, at) in ordered {
            clock.set(at);
            store.insert_generic(value, key.clone());
            expirations.insert(key, at + TEST_TTL_MS);
        }

        clock.set(sweep_at);
        let expected_removed = expirations.values().filter(|exp| **exp < sweep_at).count();
        let survivors: HashMap<&String, &u64> = expirations
            .iter()
            .filter(|(_, exp)| **exp >= sweep_at)
            .collect();

        prop_assert_eq!(store.sweep(), expected_removed);
        prop_assert_eq!(store.count_elements(), survivors.len());

        match store.oldest_expiry_hint() {
            Some(hint) => {
                let min = survivors.values().map(|exp| **exp).min();
                prop_assert_eq!(Some(hint.expires_at), min);
                prop_assert_eq!(survivors.get(&hint.key).map(|exp| **exp), min);
            }
            None => prop_assert!(survivors.is_empty()),
        }
    }

    // An expired typed entry is always returned, refreshed once per read.
    #[test]
    fn prop_expired_typed_entry_refreshes_per_read(
        key in valid_key_strategy(),
        reads in 1u32..10
    ) {
        let (mut store, clock) = new_store(0);
        store.insert_typed(Counter { key: key.clone(), expires_at: 0, refreshes: 0 });

        clock.set(TEST_TTL_MS + 1);
        for _ in 0..reads {
            prop_assert!(store.get(&key).is_some());
        }

        let refreshes = store.get(&key).and_then(Hit::typed).map(|c| c.refreshes);
        prop_assert_eq!(refreshes, Some(reads + 1));
    }

    // With nothing expiring, a full store admits each new key by evicting
    // exactly one entry, so the count never grows past the bound.
    #[test]
    fn prop_capacity_bound_without_expiry(
        keys in prop::collection::vec(valid_key_strategy(), 1..60),
        max_entries in 1i64..10
    ) {
        let (mut store, clock) = new_store(max_entries);

        for (i, key) in keys.iter().enumerate() {
            clock.set(i as u64);
            store.insert_typed(Counter { key: key.clone(), expires_at: 0, refreshes: 0 });
            prop_assert!(
                store.count_elements() as i64 <= max_entries,
                "Count {} exceeds max {}",
                store.count_elements(),
                max_entries
            );
            prop_assert!(store.get(key).is_some(), "Inserted key must be admitted");
        }
    }

    // Delete removes present keys and is a harmless success on absent ones.
    #[test]
    fn prop_delete_removes_entry(
        keys in prop::collection::vec(valid_key_strategy(), 1..20),
        victim in valid_key_strategy()
    ) {
        let (mut store, _clock) = new_store(0);
        for key in &keys {
            store.insert_generic(key.clone(), key.clone());
        }
        let unique: HashSet<&String> = keys.iter().collect();
        let expected = unique.len() - usize::from(unique.contains(&victim));

        prop_assert!(store.delete(&victim));
        prop_assert!(store.get(&victim).is_none());
        prop_assert_eq!(store.count_elements(), expected);
    }
}

// == Additional Unit Tests for Concrete Scenarios ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_entry_read_before_and_after_ttl() {
        let (mut store, clock) = new_store(0);
        store.insert_typed(Counter {
            key: "a".to_string(),
            expires_at: 0,
            refreshes: 0,
        });

        clock.set(500);
        let refreshes = store.get("a").and_then(Hit::typed).map(|c| c.refreshes);
        assert_eq!(refreshes, Some(0));

        clock.set(1_500);
        let refreshes = store.get("a").and_then(Hit::typed).map(|c| c.refreshes);
        assert_eq!(refreshes, Some(1));
    }

    #[test]
    fn test_generic_capacity_reclaimed_by_sweep() {
        let clock = ManualClock::new(0);
        let mut store: TestStore = CacheEntryStore::with_clock("scenario", clock.clone())
            .with_ttl_ms(100)
            .with_max_entries(2);

        store.insert_generic("x".to_string(), "x");
        store.insert_generic("y".to_string(), "y");

        clock.set(200);
        store.insert_generic("z".to_string(), "z");

        assert_eq!(store.count_elements(), 1);
        assert_eq!(
            store.get("z").and_then(Hit::generic),
            Some(&"z".to_string())
        );
        assert!(store.get("x").is_none());
        assert!(store.get("y").is_none());
    }
}

//! Cache Store Module
//!
//! The cache instance: a typed store for self-managing values and a generic
//! store for wrapped values, with TTL expiration, lazy sweeping and
//! best-effort capacity eviction.
//!
//! The two stores are separate key spaces. Once the typed store has been
//! used, [`CacheEntryStore::get`], [`CacheEntryStore::count_elements`] and
//! [`CacheEntryStore::elements`] only ever look at it, and capacity is
//! checked against that same reported store rather than the sum of both.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{
    Cacheable, Clock, EvictionHint, Expiring, StoreSnapshot, SystemClock, WrappedValue,
};

// == Hit ==
/// A successful lookup: either a typed entry or an unwrapped generic value.
#[derive(Debug)]
pub enum Hit<'a, T, V> {
    /// Entry from the typed store
    Typed(&'a T),
    /// Value from the generic store
    Generic(&'a V),
}

impl<'a, T, V> Hit<'a, T, V> {
    /// Returns the typed entry, if this hit came from the typed store.
    pub fn typed(self) -> Option<&'a T> {
        match self {
            Hit::Typed(entry) => Some(entry),
            Hit::Generic(_) => None,
        }
    }

    /// Returns the generic value, if this hit came from the generic store.
    pub fn generic(self) -> Option<&'a V> {
        match self {
            Hit::Generic(value) => Some(value),
            Hit::Typed(_) => None,
        }
    }
}

// == Cache Entry Store ==
/// A named TTL cache instance.
///
/// Not internally synchronized: share it behind a single lock (see
/// [`crate::tasks::SharedCacheStore`]) so both stores and the eviction hint
/// change together.
#[derive(Debug)]
pub struct CacheEntryStore<T, V, C = SystemClock> {
    /// Instance label
    name: String,
    /// Lifetime applied to each new entry, in milliseconds
    ttl_ms: u64,
    /// Capacity bound, non-positive = unbounded
    max_entries: i64,
    /// Self-managing values, materialized on first typed insert
    typed: Option<HashMap<String, T>>,
    /// Wrapped values, materialized on first generic insert
    generic: Option<HashMap<String, WrappedValue<V>>>,
    /// Soonest-expiring survivor of the last sweep
    oldest_hint: Option<EvictionHint>,
    /// Number of sweeps run
    gc_invocations: u64,
    clock: C,
}

impl<T: Cacheable, V> CacheEntryStore<T, V, SystemClock> {
    // == Constructor ==
    /// Creates an empty, unbounded store with a TTL of 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, SystemClock)
    }
}

impl<T: Cacheable, V, C: Clock> CacheEntryStore<T, V, C> {
    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(name: impl Into<String>, clock: C) -> Self {
        Self {
            name: name.into(),
            ttl_ms: 0,
            max_entries: -1,
            typed: None,
            generic: None,
            oldest_hint: None,
            gc_invocations: 0,
            clock,
        }
    }

    /// Sets the entry lifetime, builder style.
    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Sets the capacity bound, builder style.
    pub fn with_max_entries(mut self, max_entries: i64) -> Self {
        self.max_entries = max_entries;
        self
    }

    // == Insert Typed ==
    /// Stores a self-managing value under its own key.
    ///
    /// The value's expiration is reset to now + TTL. Returns the key when an
    /// existing entry was replaced and `None` for a fresh insert. A value
    /// with an empty key is dropped and also yields `None`: `get("")` is
    /// always a miss, so such an entry could never be read back.
    pub fn insert_typed(&mut self, mut value: T) -> Option<String> {
        if value.key().is_empty() {
            debug!(store = %self.name, "Rejected typed insert with empty key");
            return None;
        }

        self.typed.get_or_insert_with(HashMap::new);
        self.make_room();

        value.set_expiration(self.expires_from_now());
        let key = value.key().to_string();

        let typed = self.typed.get_or_insert_with(HashMap::new);
        typed.insert(key.clone(), value).map(|_| {
            debug!(store = %self.name, key = %key, "Replaced typed entry");
            key
        })
    }

    // == Insert Generic ==
    /// Wraps `value` and stores it under `key`.
    ///
    /// Same return contract as [`CacheEntryStore::insert_typed`]; an empty
    /// key is a no-op returning `None`.
    pub fn insert_generic(&mut self, value: V, key: impl Into<String>) -> Option<String> {
        let key = key.into();
        if key.is_empty() {
            return None;
        }

        self.generic.get_or_insert_with(HashMap::new);
        self.make_room();

        let wrapped = WrappedValue::new(value, key.clone(), self.expires_from_now());

        let generic = self.generic.get_or_insert_with(HashMap::new);
        generic.insert(key.clone(), wrapped).map(|_| {
            debug!(store = %self.name, key = %key, "Replaced generic entry");
            key
        })
    }

    // == Get ==
    /// Looks up `key`.
    ///
    /// The typed store is consulted whenever it exists; the generic store
    /// only when it does not. An expired typed entry is refreshed in place
    /// and returned whatever the refresh did. An expired generic entry reads
    /// as a miss and stays in place until swept or deleted.
    pub fn get(&mut self, key: &str) -> Option<Hit<'_, T, V>> {
        if key.is_empty() {
            return None;
        }
        let now = self.clock.now_ms();

        if let Some(typed) = self.typed.as_mut() {
            let entry = typed.get_mut(key)?;
            if expired_at(entry.expiration(), now) {
                debug!(store = %self.name, key = %key, "Refreshing expired typed entry");
                entry.refresh();
            }
            return Some(Hit::Typed(&*entry));
        }

        let wrapped = self.generic.as_ref()?.get(key)?;
        if expired_at(wrapped.expiration(), now) {
            return None;
        }
        Some(Hit::Generic(wrapped.value()))
    }

    // == Get Wrapped ==
    /// Returns the generic store's record for `key`, expired or not.
    ///
    /// Unlike [`CacheEntryStore::get`] this looks only at the generic store,
    /// never refreshes or hides anything, and leaves the record in place.
    pub fn get_wrapped(&self, key: &str) -> Option<&WrappedValue<V>> {
        if key.is_empty() {
            return None;
        }
        self.generic.as_ref()?.get(key)
    }

    // == Delete ==
    /// Removes `key` from both stores.
    ///
    /// Returns false only for an empty key; a valid key reports true whether
    /// or not anything was stored under it.
    pub fn delete(&mut self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        if let Some(typed) = self.typed.as_mut() {
            typed.remove(key);
        }
        if let Some(generic) = self.generic.as_mut() {
            generic.remove(key);
        }
        true
    }

    // == Truncate ==
    /// Drops both stores, returning the instance to its never-used state.
    pub fn truncate(&mut self) {
        self.typed = None;
        self.generic = None;
        debug!(store = %self.name, "Truncated");
    }

    // == Count ==
    /// Size of the typed store if it exists, else of the generic store, else 0.
    ///
    /// This is not the combined population of both stores.
    pub fn count_elements(&self) -> usize {
        if let Some(typed) = &self.typed {
            return typed.len();
        }
        self.generic.as_ref().map_or(0, HashMap::len)
    }

    /// Returns true if [`CacheEntryStore::count_elements`] reports nothing.
    pub fn is_empty(&self) -> bool {
        self.count_elements() == 0
    }

    // == Elements ==
    /// Every entry of the store that [`CacheEntryStore::count_elements`]
    /// reports on, in no particular order and without checking expiry.
    ///
    /// Returns `None` when neither store has been used.
    pub fn elements(&self) -> Option<Vec<Hit<'_, T, V>>> {
        if let Some(typed) = &self.typed {
            return Some(typed.values().map(Hit::Typed).collect());
        }
        self.generic
            .as_ref()
            .map(|generic| generic.values().map(|w| Hit::Generic(w.value())).collect())
    }

    // == Sweep ==
    /// Removes every expired entry from both stores and rebuilds the
    /// eviction hint from the survivors.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self) -> usize {
        self.gc_invocations += 1;
        let now = self.clock.now_ms();
        let mut hint = None;

        let mut removed = 0;
        if let Some(typed) = self.typed.as_mut() {
            removed += sweep_map(typed, now, &mut hint);
        }
        if let Some(generic) = self.generic.as_mut() {
            removed += sweep_map(generic, now, &mut hint);
        }
        self.oldest_hint = hint;

        debug!(
            store = %self.name,
            removed,
            gc_invocations = self.gc_invocations,
            "Sweep complete"
        );
        removed
    }

    // == Has Expired ==
    /// Returns true if the entry's expiration is strictly in the past.
    pub fn has_expired<E: Expiring + ?Sized>(&self, entry: &E) -> bool {
        expired_at(entry.expiration(), self.clock.now_ms())
    }

    // == Accessors ==
    /// Instance label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the instance.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Lifetime applied to new entries, in milliseconds.
    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// Changes the lifetime for subsequent inserts.
    pub fn set_ttl_ms(&mut self, ttl_ms: u64) {
        self.ttl_ms = ttl_ms;
    }

    /// Capacity bound; non-positive means unbounded.
    pub fn max_entries(&self) -> i64 {
        self.max_entries
    }

    /// Changes the capacity bound for subsequent inserts.
    pub fn set_max_entries(&mut self, max_entries: i64) {
        self.max_entries = max_entries;
    }

    /// Number of sweeps run on this instance.
    pub fn gc_invocations(&self) -> u64 {
        self.gc_invocations
    }

    /// Current eviction hint, possibly stale.
    pub fn oldest_expiry_hint(&self) -> Option<&EvictionHint> {
        self.oldest_hint.as_ref()
    }

    /// Captures configuration and counters for reporting.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            name: self.name.clone(),
            ttl_ms: self.ttl_ms,
            max_entries: self.max_entries,
            elements: self.count_elements(),
            gc_invocations: self.gc_invocations,
            hinted_key: self.oldest_hint.as_ref().map(|h| h.key.clone()),
            taken_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    // == Capacity ==
    fn has_room(&self) -> bool {
        self.max_entries <= 0 || (self.count_elements() as i64) < self.max_entries
    }

    /// Sweeps when full, falling back to evicting the hinted entry when the
    /// sweep reclaimed nothing. Does not guarantee that room was made.
    fn make_room(&mut self) {
        if self.has_room() {
            return;
        }
        if self.sweep() > 0 {
            return;
        }
        if let Some(hint) = self.oldest_hint.take() {
            debug!(store = %self.name, key = %hint.key, "Evicting oldest expiring entry");
            self.delete(&hint.key);
        }
    }

    fn expires_from_now(&self) -> u64 {
        self.clock.now_ms().saturating_add(self.ttl_ms)
    }
}

fn expired_at(expires_at: u64, now_ms: u64) -> bool {
    expires_at < now_ms
}

fn sweep_map<E: Expiring>(
    map: &mut HashMap<String, E>,
    now_ms: u64,
    hint: &mut Option<EvictionHint>,
) -> usize {
    let before = map.len();
    map.retain(|key, entry| {
        let expires_at = entry.expiration();
        if expired_at(expires_at, now_ms) {
            return false;
        }
        EvictionHint::observe(hint, key, expires_at);
        true
    });
    before - map.len()
}

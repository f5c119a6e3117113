//! Store Snapshot Module
//!
//! Serializable point-in-time view of a store's configuration and counters.

use serde::Serialize;

// == Store Snapshot ==
/// Configuration and bookkeeping of a store at a given moment.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    /// Instance name
    pub name: String,
    /// Lifetime applied to new entries, in milliseconds
    pub ttl_ms: u64,
    /// Capacity bound, non-positive = unbounded
    pub max_entries: i64,
    /// Element count as reported by `count_elements`
    pub elements: usize,
    /// Number of sweeps run so far
    pub gc_invocations: u64,
    /// Key currently named by the eviction hint
    pub hinted_key: Option<String>,
    /// When the snapshot was taken (RFC 3339)
    pub taken_at: String,
}

impl StoreSnapshot {
    /// Returns true if the snapshot's store enforces a capacity bound.
    pub fn is_bounded(&self) -> bool {
        self.max_entries > 0
    }
}

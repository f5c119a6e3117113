//! Cache Module
//!
//! Provides the TTL cache instance with typed and generic stores, lazy
//! sweeping and best-effort eviction.

mod cacheable;
mod clock;
mod entry;
mod hint;
mod snapshot;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use cacheable::{Cacheable, Expiring};
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::WrappedValue;
pub use hint::EvictionHint;
pub use snapshot::StoreSnapshot;
pub use store::{CacheEntryStore, Hit};

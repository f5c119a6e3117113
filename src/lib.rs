//! TTL Cache - An in-process TTL object cache instance
//!
//! Holds self-refreshing typed values and store-wrapped generic values,
//! with lazy sweeping and best-effort capacity eviction.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheEntryStore, Cacheable, Expiring, Hit};
pub use config::Config;
pub use tasks::{spawn_sweep_task, SharedCacheStore};

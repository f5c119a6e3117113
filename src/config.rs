//! Configuration Module
//!
//! Loads cache instance settings from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{CacheEntryStore, Cacheable};
use crate::error::{CacheError, Result};

/// Cache instance configuration.
///
/// Unset variables fall back to defaults; set but unparsable ones are errors.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instance name
    pub name: String,
    /// Lifetime of new entries in milliseconds
    pub ttl_ms: u64,
    /// Capacity bound, non-positive = unbounded
    pub max_entries: i64,
    /// Interval between caller-driven sweeps in milliseconds
    pub sweep_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAME` - Instance name (default: "default")
    /// - `CACHE_TTL_MS` - Entry lifetime in milliseconds (default: 0)
    /// - `CACHE_MAX_ENTRIES` - Capacity bound, <= 0 for unbounded (default: -1)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep task period (default: 1000)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            name: env::var("CACHE_NAME").unwrap_or(defaults.name),
            ttl_ms: parse_var("CACHE_TTL_MS")?.unwrap_or(defaults.ttl_ms),
            max_entries: parse_var("CACHE_MAX_ENTRIES")?.unwrap_or(defaults.max_entries),
            sweep_interval_ms: parse_var("CACHE_SWEEP_INTERVAL_MS")?
                .unwrap_or(defaults.sweep_interval_ms),
        })
    }

    /// Builds an empty store with this configuration applied.
    pub fn build_store<T: Cacheable, V>(&self) -> CacheEntryStore<T, V> {
        CacheEntryStore::new(self.name.clone())
            .with_ttl_ms(self.ttl_ms)
            .with_max_entries(self.max_entries)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            ttl_ms: 0,
            max_entries: -1,
            sweep_interval_ms: 1000,
        }
    }
}

fn parse_var<F: FromStr>(name: &str) -> Result<Option<F>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig(format!("{}={}", name, raw))),
        Err(_) => Ok(None),
    }
}

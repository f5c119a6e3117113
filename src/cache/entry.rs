//! Wrapped Value Module
//!
//! Record the store builds around arbitrary values placed in the generic store.

use crate::cache::Expiring;

// == Wrapped Value ==
/// An arbitrary value together with the key and expiration assigned by the store.
#[derive(Debug, Clone)]
pub struct WrappedValue<V> {
    /// The stored value
    value: V,
    /// Key the value was inserted under
    key: String,
    /// Expiration timestamp (Unix milliseconds)
    expires_at: u64,
}

impl<V> WrappedValue<V> {
    // == Constructor ==
    /// Wraps `value`, expiring at the absolute time `expires_at`.
    pub(crate) fn new(value: V, key: String, expires_at: u64) -> Self {
        Self {
            value,
            key,
            expires_at,
        }
    }

    /// Returns the wrapped value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the key the value was stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds as of `now_ms`, 0 once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }
}

impl<V> Expiring for WrappedValue<V> {
    fn expiration(&self) -> u64 {
        self.expires_at
    }
}

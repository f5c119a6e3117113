//! Eviction Hint Module
//!
//! Single-slot pointer at the soonest-expiring entry seen by the last sweep.

// == Eviction Hint ==
/// Best-effort eviction target.
///
/// Only sweeps refresh the hint, so between sweeps the key may already be
/// gone or no longer the oldest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionHint {
    /// Expiration timestamp of the hinted entry (Unix milliseconds)
    pub expires_at: u64,
    /// Key of the hinted entry
    pub key: String,
}

impl EvictionHint {
    // == Observe ==
    /// Offers a surviving entry to the hint slot.
    ///
    /// An empty slot takes the first survivor; afterwards a survivor replaces
    /// the current hint only when it expires strictly earlier.
    pub fn observe(slot: &mut Option<EvictionHint>, key: &str, expires_at: u64) {
        match slot {
            Some(hint) if hint.expires_at <= expires_at => {}
            _ => {
                *slot = Some(EvictionHint {
                    expires_at,
                    key: key.to_string(),
                })
            }
        }
    }
}

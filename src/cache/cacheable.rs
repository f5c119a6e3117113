//! Cacheable Capability
//!
//! Contract for values that manage their own key, expiration and refresh.

// == Expiring ==
/// Anything carrying an absolute expiration timestamp.
pub trait Expiring {
    /// Absolute expiration time in Unix milliseconds.
    fn expiration(&self) -> u64;
}

// == Cacheable ==
/// A value that can live in the typed store.
///
/// The store stamps the expiration on insert and calls [`Cacheable::refresh`]
/// when an expired entry is read. What a refresh does (reload, recompute,
/// push the expiration forward, or nothing) is up to the implementor.
pub trait Cacheable: Expiring {
    /// Stable key the value is stored under.
    fn key(&self) -> &str;

    /// Overwrites the expiration time.
    fn set_expiration(&mut self, expires_at: u64);

    /// Brings the value up to date after it was found expired.
    fn refresh(&mut self);
}

impl<T: Expiring + ?Sized> Expiring for Box<T> {
    fn expiration(&self) -> u64 {
        (**self).expiration()
    }
}

impl<T: Cacheable + ?Sized> Cacheable for Box<T> {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn set_expiration(&mut self, expires_at: u64) {
        (**self).set_expiration(expires_at)
    }

    fn refresh(&mut self) {
        (**self).refresh()
    }
}

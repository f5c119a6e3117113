//! Sweep Task
//!
//! Periodically sweeps expired entries out of a shared cache instance.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheEntryStore, Cacheable, Clock, SystemClock};

/// A store shared across tasks.
///
/// Every operation, reads included, takes the write lock: `get` may refresh
/// typed entries, and the stores and eviction hint must change as one unit.
pub type SharedCacheStore<T, V, C = SystemClock> = Arc<RwLock<CacheEntryStore<T, V, C>>>;

/// Spawns a background task that sweeps `store` every `interval_ms`.
///
/// The store itself never schedules work; this task is one way for a caller
/// to do it.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let store: SharedCacheStore<Session, String> =
///     Arc::new(RwLock::new(CacheEntryStore::new("sessions").with_ttl_ms(30_000)));
/// let sweep_handle = spawn_sweep_task(store.clone(), 1000);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<T, V, C>(
    store: SharedCacheStore<T, V, C>,
    interval_ms: u64,
) -> JoinHandle<()>
where
    T: Cacheable + Send + Sync + 'static,
    V: Send + Sync + 'static,
    C: Clock + 'static,
{
    let interval = Duration::from_millis(interval_ms);

    tokio::spawn(async move {
        info!("Starting sweep task with interval of {} ms", interval_ms);

        loop {
            tokio::time::sleep(interval).await;

            let (removed, name) = {
                let mut guard = store.write().await;
                (guard.sweep(), guard.name().to_string())
            };

            if removed > 0 {
                info!(store = %name, "Sweep: removed {} expired entries", removed);
            } else {
                debug!(store = %name, "Sweep: no expired entries found");
            }
        }
    })
}

//! TTL Cache - demo host for a single cache instance
//!
//! Drives a configured store with a small insert/read workload while a
//! sweep task reclaims expired entries, logging a snapshot each round.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{spawn_sweep_task, Cacheable, Config, Hit, SharedCacheStore};

type DynCacheable = Box<dyn Cacheable + Send + Sync>;

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache store
/// 4. Start the sweep task
/// 5. Run the workload until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("loading cache configuration")?;
    info!(
        "Configuration loaded: name={}, ttl={}ms, max_entries={}, sweep_interval={}ms",
        config.name, config.ttl_ms, config.max_entries, config.sweep_interval_ms
    );

    let store: SharedCacheStore<DynCacheable, String> =
        Arc::new(RwLock::new(config.build_store()));

    let sweep_handle = spawn_sweep_task(store.clone(), config.sweep_interval_ms);
    info!("Sweep task started");

    let initial = store.read().await.snapshot();
    if initial.is_bounded() {
        info!("Store '{}' bounded to {} entries", initial.name, initial.max_entries);
    } else {
        info!("Store '{}' is unbounded", initial.name);
    }

    tokio::select! {
        _ = run_workload(store.clone(), config.sweep_interval_ms) => {}
        _ = shutdown_signal() => {}
    }

    sweep_handle.abort();
    warn!("Sweep task aborted");

    let snapshot = store.read().await.snapshot();
    info!("Final state: {}", serde_json::to_string(&snapshot)?);
    Ok(())
}

/// Inserts one entry per round and reads back the previous one.
async fn run_workload(store: SharedCacheStore<DynCacheable, String>, round_ms: u64) {
    let mut round: u64 = 0;
    loop {
        tokio::time::sleep(Duration::from_millis(round_ms.max(1))).await;

        let key = format!("round-{}", round);
        let previous = round.checked_sub(1).map(|r| format!("round-{}", r));

        let (hit, snapshot) = {
            let mut guard = store.write().await;
            guard.insert_generic(format!("payload {}", round), key);
            let hit = previous
                .as_deref()
                .and_then(|k| guard.get(k).and_then(Hit::generic).cloned());
            (hit, guard.snapshot())
        };

        match (previous, hit) {
            (Some(k), Some(_)) => info!("Round {}: {} still cached", round, k),
            (Some(k), None) => info!("Round {}: {} expired or evicted", round, k),
            (None, _) => {}
        }
        if let Ok(json) = serde_json::to_string(&snapshot) {
            info!("Snapshot: {}", json);
        }
        round += 1;
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

//! Background Tasks Module
//!
//! Caller-owned tasks driving a shared cache instance.
//!
//! # Tasks
//! - Sweep: runs `sweep()` on a shared store at a fixed interval

mod sweep;

pub use sweep::{spawn_sweep_task, SharedCacheStore};

//! Benchmark profiles and utilities for the Aureole sort animation framework.
//!
//! - [`bench_config`]: stage configuration with alignment and timer waits
//!   switched off, so a run measures engine and scheduler work only
//! - [`reference_store`]: deterministic seeded store of a given size
//! - [`reversed_store`]: worst-case ordering for both engines

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::time::Duration;

use aureole_core::{Entry, EntryStore};
use aureole_engine::{seed_batch, StageConfig};

/// Store sizes used across the benches.
pub const SIZES: [usize; 3] = [64, 256, 1024];

/// Stage configuration for benchmarking: no interval alignment and a
/// zero timer delay.
pub fn bench_config() -> StageConfig {
    StageConfig {
        defer_delay: Duration::ZERO,
        align_to_interval: false,
        ..StageConfig::default()
    }
}

/// A store of `n` seeded entries under the default interval.
pub fn reference_store(n: usize, seed: u64) -> EntryStore {
    let config = bench_config();
    EntryStore::with_entries(seed_batch(n, config.interval_ms, seed), config.interval_ms)
}

/// A store of `n` entries in strictly descending key order.
pub fn reversed_store(n: usize) -> EntryStore {
    let config = bench_config();
    let step = config.interval_ms / (n.max(1) as f64);
    let entries = (0..n)
        .rev()
        .map(|i| Entry::new(0.0, i as f64 * step))
        .collect();
    EntryStore::with_entries(entries, config.interval_ms)
}

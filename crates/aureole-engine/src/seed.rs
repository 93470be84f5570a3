//! Seed batches: the wholesale replacement for a store's entries.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use aureole_core::Entry;

/// Build `count` unvisited entries with angles uniform in `[0, 2π)` and
/// timestamps uniform in `[0, interval)`.
///
/// Deterministic: the same `seed` always yields the same batch.
pub fn seed_batch(count: usize, interval: f64, seed: u64) -> Vec<Entry> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let angle = rng.random::<f64>() * TAU;
            let timestamp = rng.random::<f64>() * interval;
            Entry::new(angle, timestamp)
        })
        .collect()
}

//! Store fixtures built from key lists.
//!
//! Each entry's angle is derived from its key (`key / 1000`), so after a
//! sort a test can check that every angle still travels with its key.

use aureole_core::{Entry, EntryStore, DEFAULT_INTERVAL};

/// Entries whose timestamps are `keys` and whose angles are `key / 1000`.
pub fn entries_from_keys(keys: &[f64]) -> Vec<Entry> {
    keys.iter().map(|&k| Entry::new(k / 1000.0, k)).collect()
}

/// A store of [`entries_from_keys`] under the default interval.
pub fn store_from_keys(keys: &[f64]) -> EntryStore {
    EntryStore::with_entries(entries_from_keys(keys), DEFAULT_INTERVAL)
}

/// `n - 1, n - 2, ..., 0` as keys.
pub fn descending_keys(n: usize) -> Vec<f64> {
    (0..n).rev().map(|k| k as f64).collect()
}

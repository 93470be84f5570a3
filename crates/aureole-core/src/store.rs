//! The entry store and its run guard.
//!
//! [`EntryStore`] is the single shared mutable resource of the system:
//! an index-addressable sequence of [`Entry`] that sort engines permute in
//! place. A store admits at most one run at a time. A run must
//! [`acquire`](EntryStore::acquire) a [`RunToken`] before touching the
//! store and [`release`](EntryStore::release) it on completion; while a
//! token is outstanding, a second acquisition, a reseed, or a push is
//! rejected with [`RunError::RunInProgress`].

use crate::{Entry, EntryValue, RunError, RunId};

/// Default sort-key interval, in timestamp units.
pub const DEFAULT_INTERVAL: f64 = 1000.0;

/// Proof that a run holds an [`EntryStore`].
///
/// Not `Clone`: there is exactly one token per run, and handing it back
/// via [`EntryStore::release`] consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct RunToken {
    run: RunId,
}

impl RunToken {
    /// The run this token belongs to.
    pub fn run_id(&self) -> RunId {
        self.run
    }
}

/// Ordered, index-addressable collection of entries.
///
/// No ordering invariant holds while idle. After a completed sort run the
/// entries are non-decreasing by [`sort_key`](Self::sort_key).
#[derive(Clone, Debug)]
pub struct EntryStore {
    entries: Vec<Entry>,
    interval: f64,
    active: Option<RunId>,
}

impl EntryStore {
    /// Create an empty store with the given sort-key interval.
    pub fn new(interval: f64) -> Self {
        Self::with_entries(Vec::new(), interval)
    }

    /// Create a store holding `entries`.
    pub fn with_entries(entries: Vec<Entry>, interval: f64) -> Self {
        Self {
            entries,
            interval,
            active: None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sort-key interval.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// All entries in store order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The entry at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// The value held at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn value(&self, index: usize) -> EntryValue {
        self.entries[index].value
    }

    /// Overwrite the value held at `index`. The slot's visit count is
    /// left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_value(&mut self, index: usize, value: EntryValue) {
        self.entries[index].value = value;
    }

    /// Sort key of the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn sort_key(&self, index: usize) -> f64 {
        self.entries[index].sort_key(self.interval)
    }

    /// All sort keys in store order.
    pub fn sort_keys(&self) -> Vec<f64> {
        self.entries
            .iter()
            .map(|e| e.sort_key(self.interval))
            .collect()
    }

    /// Add `weight` to the visit counter of the slot at `index`,
    /// saturating at `u32::MAX`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn bump_visits(&mut self, index: usize, weight: u32) {
        let e = &mut self.entries[index];
        e.visits = e.visits.saturating_add(weight);
    }

    /// Whether the entries are non-decreasing by sort key.
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].sort_key(self.interval) <= w[1].sort_key(self.interval))
    }

    /// Append a single entry. Refused while a run holds the store.
    pub fn push(&mut self, entry: Entry) -> Result<(), RunError> {
        self.ensure_idle()?;
        self.entries.push(entry);
        Ok(())
    }

    /// Replace every entry wholesale, discarding prior progress.
    /// Refused while a run holds the store.
    pub fn replace(&mut self, entries: Vec<Entry>) -> Result<(), RunError> {
        self.ensure_idle()?;
        self.entries = entries;
        Ok(())
    }

    /// The run currently holding the store, if any.
    pub fn active_run(&self) -> Option<RunId> {
        self.active
    }

    /// Returns `true` while a run holds the store.
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Acquire the store for a new run.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::RunInProgress`] if another run already holds it.
    pub fn acquire(&mut self) -> Result<RunToken, RunError> {
        self.ensure_idle()?;
        let run = RunId::next();
        self.active = Some(run);
        Ok(RunToken { run })
    }

    /// Release the store at the end of a run.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::NotRunning`] if no run holds the store, or
    /// [`RunError::TokenMismatch`] if `token` belongs to another run. The
    /// store stays held in the mismatch case.
    pub fn release(&mut self, token: RunToken) -> Result<(), RunError> {
        match self.active {
            None => Err(RunError::NotRunning),
            Some(active) if active != token.run => Err(RunError::TokenMismatch {
                expected: active,
                found: token.run,
            }),
            Some(_) => {
                self.active = None;
                Ok(())
            }
        }
    }

    fn ensure_idle(&self) -> Result<(), RunError> {
        match self.active {
            Some(active) => Err(RunError::RunInProgress { active }),
            None => Ok(()),
        }
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store(keys: &[f64]) -> EntryStore {
        let entries = keys
            .iter()
            .enumerate()
            .map(|(i, &k)| Entry::new(i as f64, k))
            .collect();
        EntryStore::with_entries(entries, DEFAULT_INTERVAL)
    }

    #[test]
    fn default_store_is_empty_and_idle() {
        let s = EntryStore::default();
        assert!(s.is_empty());
        assert!(!s.is_running());
        assert_eq!(s.interval(), DEFAULT_INTERVAL);
        assert!(s.is_sorted());
    }

    #[test]
    fn set_value_keeps_visits_in_slot() {
        let mut s = store(&[1.0, 2.0]);
        s.bump_visits(0, 5);
        let v = s.value(1);
        s.set_value(0, v);
        assert_eq!(s.get(0).map(|e| e.visits), Some(5));
        assert_eq!(s.value(0), v);
    }

    #[test]
    fn bump_visits_saturates() {
        let mut s = store(&[1.0]);
        s.bump_visits(0, u32::MAX);
        s.bump_visits(0, 7);
        assert_eq!(s.entries()[0].visits, u32::MAX);
    }

    #[test]
    fn sort_keys_reduce_modulo_interval() {
        let s = store(&[1500.0, 20.0]);
        assert_eq!(s.sort_keys(), vec![500.0, 20.0]);
        assert!(!s.is_sorted());
    }

    #[test]
    fn acquire_rejects_second_run() {
        let mut s = store(&[1.0]);
        let token = s.acquire().unwrap();
        let err = s.acquire().unwrap_err();
        assert_eq!(
            err,
            RunError::RunInProgress {
                active: token.run_id()
            }
        );
        s.release(token).unwrap();
        assert!(s.acquire().is_ok());
    }

    #[test]
    fn replace_and_push_refused_while_running() {
        let mut s = store(&[1.0]);
        let token = s.acquire().unwrap();
        assert!(matches!(
            s.replace(Vec::new()),
            Err(RunError::RunInProgress { .. })
        ));
        assert!(matches!(
            s.push(Entry::new(0.0, 0.0)),
            Err(RunError::RunInProgress { .. })
        ));
        assert_eq!(s.len(), 1);
        s.release(token).unwrap();
        s.replace(Vec::new()).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn release_with_foreign_token_keeps_store_held() {
        let mut a = store(&[1.0]);
        let mut b = store(&[1.0]);
        let ta = a.acquire().unwrap();
        let tb = b.acquire().unwrap();
        let expected = ta.run_id();
        let found = tb.run_id();
        assert_eq!(
            a.release(tb),
            Err(RunError::TokenMismatch { expected, found })
        );
        assert_eq!(a.active_run(), Some(expected));
        a.release(ta).unwrap();
    }

    #[test]
    fn release_without_run() {
        let mut a = store(&[]);
        let mut b = store(&[]);
        let token = b.acquire().unwrap();
        assert_eq!(a.release(token), Err(RunError::NotRunning));
    }

    proptest! {
        #[test]
        fn sort_keys_lie_in_interval(ts in proptest::collection::vec(-1e6f64..1e6, 0..64)) {
            let s = store(&ts);
            for k in s.sort_keys() {
                prop_assert!((0.0..DEFAULT_INTERVAL).contains(&k));
            }
        }
    }
}

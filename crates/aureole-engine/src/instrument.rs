//! Instrumentation applied to engine accesses.
//!
//! Engines never touch visit counters. The [`Run`](crate::Run) driver
//! hands every reported [`Access`] to an [`Instrument`] before consulting
//! the scheduler.

use aureole_core::{Access, EntryStore, VisitWeights};

/// Callback invoked once per engine access.
pub trait Instrument: Send {
    /// Record `access` against `store`.
    fn on_access(&mut self, store: &mut EntryStore, access: Access);
}

/// Bumps the accessed slot's visit counter by the site's weight.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisitCounter {
    weights: VisitWeights,
}

impl VisitCounter {
    /// Create a counter using `weights`.
    pub fn new(weights: VisitWeights) -> Self {
        Self { weights }
    }

    /// The weights in use.
    pub fn weights(&self) -> VisitWeights {
        self.weights
    }
}

impl Instrument for VisitCounter {
    fn on_access(&mut self, store: &mut EntryStore, access: Access) {
        store.bump_visits(access.index, self.weights.weight(access.site));
    }
}

/// Ignores every access.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Instrument for Silent {
    fn on_access(&mut self, _store: &mut EntryStore, _access: Access) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use aureole_core::{AccessSite, Entry, DEFAULT_INTERVAL};

    fn store() -> EntryStore {
        EntryStore::with_entries(vec![Entry::new(0.0, 1.0); 3], DEFAULT_INTERVAL)
    }

    #[test]
    fn counter_applies_site_weight() {
        let mut s = store();
        let mut c = VisitCounter::default();
        c.on_access(&mut s, Access::new(1, AccessSite::Parent));
        c.on_access(&mut s, Access::new(1, AccessSite::LeftChild));
        c.on_access(&mut s, Access::new(2, AccessSite::LeftChild));
        let visits: Vec<u32> = s.entries().iter().map(|e| e.visits).collect();
        assert_eq!(visits, vec![0, 3, 1]);
    }

    #[test]
    fn silent_leaves_store_untouched() {
        let mut s = store();
        Silent.on_access(&mut s, Access::new(0, AccessSite::Exchange));
        assert!(s.entries().iter().all(|e| e.visits == 0));
    }
}

//! Integration test: the run driver against fixture stores.
//!
//! Exercises [`Run`] directly, without a stage, to check tick closed forms
//! and how instrument weights translate into visit totals.

use std::sync::{Arc, Mutex};

use aureole_core::{Access, AccessSite, EntryStore, VisitWeights};
use aureole_engine::config::StageConfig;
use aureole_engine::instrument::{Instrument, VisitCounter};
use aureole_engine::run::{Advance, Run};
use aureole_sort::{HeapSort, SelectionSort, SortKind};
use aureole_test_utils::{descending_keys, store_from_keys};

/// Forwards to a [`VisitCounter`] and keeps every access it saw.
struct Tap {
    counter: VisitCounter,
    seen: Arc<Mutex<Vec<Access>>>,
}

impl Instrument for Tap {
    fn on_access(&mut self, store: &mut EntryStore, access: Access) {
        self.seen.lock().unwrap().push(access);
        self.counter.on_access(store, access);
    }
}

fn total_visits(store: &EntryStore) -> u64 {
    store.entries().iter().map(|e| u64::from(e.visits)).sum()
}

#[test]
fn selection_ticks_match_closed_form() {
    for n in 0..12 {
        let mut store = store_from_keys(&descending_keys(n));
        let run = Run::start(&mut store, SortKind::Selection, &StageConfig::default()).unwrap();
        let summary = run.finish(&mut store).unwrap();
        assert_eq!(summary.step_count(), SelectionSort::expected_ticks(n as u64));
        assert!(store.is_sorted());
    }
}

#[test]
fn heap_ticks_stay_within_bound() {
    for n in 0..40 {
        let mut store = store_from_keys(&descending_keys(n));
        let run = Run::start(&mut store, SortKind::Heap, &StageConfig::default()).unwrap();
        let summary = run.finish(&mut store).unwrap();
        assert!(summary.step_count() <= HeapSort::tick_bound(n as u64));
        assert!(store.is_sorted(), "heap sort left {n} entries unsorted");
    }
}

#[test]
fn uniform_weights_count_every_access_once() {
    let config = StageConfig {
        weights: VisitWeights::uniform(1),
        ..StageConfig::default()
    };
    for kind in SortKind::ALL {
        let mut store = store_from_keys(&[7.0, 3.0, 9.0, 1.0, 5.0, 8.0]);
        let run = Run::start(&mut store, kind, &config).unwrap();
        let summary = run.finish(&mut store).unwrap();
        assert_eq!(total_visits(&store), summary.step_count());
    }
}

#[test]
fn default_weights_halve_left_child_visits() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut store = store_from_keys(&[4.0, 8.0, 1.0, 6.0, 2.0, 7.0, 3.0]);
    let tap = Tap {
        counter: VisitCounter::new(VisitWeights::default()),
        seen: Arc::clone(&seen),
    };
    let run = Run::start(&mut store, SortKind::Heap, &StageConfig::default())
        .unwrap()
        .with_instrument(Box::new(tap));
    let summary = run.finish(&mut store).unwrap();

    let seen = seen.lock().unwrap();
    let left = seen
        .iter()
        .filter(|a| a.site == AccessSite::LeftChild)
        .count() as u64;
    assert!(left > 0);
    assert_eq!(seen.len() as u64, summary.step_count());
    assert_eq!(total_visits(&store), 2 * summary.step_count() - left);
}

#[test]
fn advancing_past_finish_stays_finished() {
    let mut store = store_from_keys(&[2.0, 1.0]);
    let mut run = Run::start(&mut store, SortKind::Selection, &StageConfig::default()).unwrap();
    while run.advance(&mut store).unwrap() != Advance::Finished {}
    assert!(run.is_finished());
    assert_eq!(run.advance(&mut store), Ok(Advance::Finished));
    assert_eq!(run.ticks(), 7);
    run.finish(&mut store).unwrap();
}

//! Heap sort as a resumable state machine.
//!
//! Sift-down is the reusable primitive. A sift at `parent` reads the
//! parent ([`Parent`]), compares the left child ([`LeftChild`]) and, if it
//! lies inside the heap, the right child ([`RightChild`]). When a child is
//! larger, the two values are exchanged with two writes ([`Exchange`]) and
//! the sift continues at the child. Sift-down is tail recursive, so the
//! only continuation a sift carries is where to resume when it settles.
//!
//! Phase 1 builds a max-heap by sifting every index from `n/2 - 1` down
//! to `0`. Phase 2 swaps the root with each index from `n - 1` down to
//! `1` (two writes) and re-sifts the root over the shrunken heap.
//!
//! [`Parent`]: AccessSite::Parent
//! [`LeftChild`]: AccessSite::LeftChild
//! [`RightChild`]: AccessSite::RightChild
//! [`Exchange`]: AccessSite::Exchange

use aureole_core::{Access, AccessSite, EntryStore, EntryValue};

use crate::engine::{SortEngine, Step};

/// Where to continue once a sift-down settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resume {
    /// Phase 1: the heap rooted at `index` is built.
    Build { index: usize },
    /// Phase 2: the heap is restored after extracting into `index`.
    Extract { index: usize },
}

/// An in-flight sift-down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Sift {
    parent: usize,
    len: usize,
    resume: Resume,
}

impl Sift {
    fn left(&self) -> usize {
        2 * self.parent + 1
    }

    fn right(&self) -> usize {
        2 * self.parent + 2
    }
}

/// Work pending after the most recently reported access.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Cursor {
    Start,
    /// Read the parent value.
    ReadParent { sift: Sift },
    /// Compare the left child against the parent.
    ProbeLeft { sift: Sift, parent_value: EntryValue },
    /// Compare the right child against the best so far.
    ProbeRight {
        sift: Sift,
        parent_value: EntryValue,
        best: usize,
        best_key: f64,
    },
    /// Write the larger child's value into the parent slot.
    Lift {
        sift: Sift,
        parent_value: EntryValue,
        best: usize,
    },
    /// Write the old parent value into the child slot.
    Sink {
        sift: Sift,
        parent_value: EntryValue,
        best: usize,
    },
    /// Write the slot at `index` into the root, holding the old root.
    RootOut { index: usize },
    /// Write the held root into the slot at `index`.
    RootIn { index: usize, held: EntryValue },
    Finished,
}

/// Heap sort engine. See the [module docs](self).
#[derive(Debug)]
pub struct HeapSort {
    cursor: Cursor,
}

impl HeapSort {
    /// Create an engine positioned before the heap build.
    pub fn new() -> Self {
        Self {
            cursor: Cursor::Start,
        }
    }

    /// Upper bound on the access count for a store of length `n`.
    ///
    /// Every sift level costs at most five accesses (parent, two
    /// children, two writes) and a sift over a heap of `len` entries
    /// descends at most `floor(log2(len))` levels before its final,
    /// exchange-free settle. The build phase sifts `n/2` roots, the
    /// extraction phase `n - 1` roots with two writes each.
    pub fn tick_bound(n: u64) -> u64 {
        if n < 2 {
            return 0;
        }
        let depth = u64::from(n.ilog2());
        let per_sift = 5 * depth + 3;
        (n / 2) * per_sift + (n - 1) * (2 + per_sift)
    }

    fn start(store: &EntryStore) -> (Cursor, Step) {
        let n = store.len();
        match (n / 2).checked_sub(1) {
            Some(index) => Self::sift(Sift {
                parent: index,
                len: n,
                resume: Resume::Build { index },
            }),
            None => Self::extract(n.saturating_sub(1)),
        }
    }

    fn sift(sift: Sift) -> (Cursor, Step) {
        (
            Cursor::ReadParent { sift },
            Step::Access(Access::new(sift.parent, AccessSite::Parent)),
        )
    }

    fn extract(index: usize) -> (Cursor, Step) {
        if index == 0 {
            return (Cursor::Finished, Step::Done);
        }
        (
            Cursor::RootOut { index },
            Step::Access(Access::new(0, AccessSite::Exchange)),
        )
    }

    fn resume(store: &EntryStore, resume: Resume) -> (Cursor, Step) {
        match resume {
            Resume::Build { index: 0 } => Self::extract(store.len() - 1),
            Resume::Build { index } => Self::sift(Sift {
                parent: index - 1,
                len: store.len(),
                resume: Resume::Build { index: index - 1 },
            }),
            Resume::Extract { index } => Self::extract(index - 1),
        }
    }

    fn conclude(
        store: &EntryStore,
        sift: Sift,
        parent_value: EntryValue,
        best: usize,
    ) -> (Cursor, Step) {
        if best == sift.parent {
            Self::resume(store, sift.resume)
        } else {
            (
                Cursor::Lift {
                    sift,
                    parent_value,
                    best,
                },
                Step::Access(Access::new(sift.parent, AccessSite::Exchange)),
            )
        }
    }
}

impl Default for HeapSort {
    fn default() -> Self {
        Self::new()
    }
}

impl SortEngine for HeapSort {
    fn name(&self) -> &str {
        "heap"
    }

    fn step(&mut self, store: &mut EntryStore) -> Step {
        let (cursor, step) = match self.cursor {
            Cursor::Start => Self::start(store),
            Cursor::ReadParent { sift } => {
                let parent_value = store.value(sift.parent);
                if sift.left() < sift.len {
                    (
                        Cursor::ProbeLeft { sift, parent_value },
                        Step::Access(Access::new(sift.left(), AccessSite::LeftChild)),
                    )
                } else {
                    Self::resume(store, sift.resume)
                }
            }
            Cursor::ProbeLeft { sift, parent_value } => {
                let parent_key = parent_value.sort_key(store.interval());
                let left_key = store.sort_key(sift.left());
                let (best, best_key) = if left_key > parent_key {
                    (sift.left(), left_key)
                } else {
                    (sift.parent, parent_key)
                };
                if sift.right() < sift.len {
                    (
                        Cursor::ProbeRight {
                            sift,
                            parent_value,
                            best,
                            best_key,
                        },
                        Step::Access(Access::new(sift.right(), AccessSite::RightChild)),
                    )
                } else {
                    Self::conclude(store, sift, parent_value, best)
                }
            }
            Cursor::ProbeRight {
                sift,
                parent_value,
                best,
                best_key,
            } => {
                let best = if store.sort_key(sift.right()) > best_key {
                    sift.right()
                } else {
                    best
                };
                Self::conclude(store, sift, parent_value, best)
            }
            Cursor::Lift {
                sift,
                parent_value,
                best,
            } => {
                store.set_value(sift.parent, store.value(best));
                (
                    Cursor::Sink {
                        sift,
                        parent_value,
                        best,
                    },
                    Step::Access(Access::new(best, AccessSite::Exchange)),
                )
            }
            Cursor::Sink {
                sift,
                parent_value,
                best,
            } => {
                store.set_value(best, parent_value);
                Self::sift(Sift {
                    parent: best,
                    ..sift
                })
            }
            Cursor::RootOut { index } => {
                let held = store.value(0);
                store.set_value(0, store.value(index));
                (
                    Cursor::RootIn { index, held },
                    Step::Access(Access::new(index, AccessSite::Exchange)),
                )
            }
            Cursor::RootIn { index, held } => {
                store.set_value(index, held);
                Self::sift(Sift {
                    parent: 0,
                    len: index,
                    resume: Resume::Extract { index },
                })
            }
            Cursor::Finished => (Cursor::Finished, Step::Done),
        };
        self.cursor = cursor;
        step
    }

    fn is_finished(&self) -> bool {
        self.cursor == Cursor::Finished
    }

    fn settle(&mut self, store: &mut EntryStore) {
        match self.cursor {
            Cursor::Sink {
                parent_value, best, ..
            } => store.set_value(best, parent_value),
            Cursor::RootIn { index, held } => store.set_value(index, held),
            _ => {}
        }
        self.cursor = Cursor::Finished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aureole_core::{Entry, DEFAULT_INTERVAL};
    use proptest::prelude::*;

    fn store(keys: &[f64]) -> EntryStore {
        let entries = keys
            .iter()
            .map(|&k| Entry::new(k / 100.0, k))
            .collect();
        EntryStore::with_entries(entries, DEFAULT_INTERVAL)
    }

    fn drive(store: &mut EntryStore) -> Vec<Access> {
        let mut engine = HeapSort::new();
        let mut accesses = Vec::new();
        while let Step::Access(a) = engine.step(store) {
            accesses.push(a);
        }
        assert!(engine.is_finished());
        accesses
    }

    #[test]
    fn sorts_small_example() {
        let mut s = store(&[3.0, 1.0, 4.0, 2.0]);
        drive(&mut s);
        assert_eq!(s.sort_keys(), vec![1.0, 2.0, 3.0, 4.0]);
        for e in s.entries() {
            assert!((e.angle() * 100.0 - e.timestamp()).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_and_single_finish_without_ticks() {
        for keys in [&[][..], &[5.0][..]] {
            let mut s = store(keys);
            let mut engine = HeapSort::new();
            assert_eq!(engine.step(&mut s), Step::Done);
            assert!(engine.is_finished());
        }
    }

    #[test]
    fn two_entries_trace() {
        // Build: sift(0) finds the larger left child and exchanges; the
        // re-sift at 1 has no children. Extract: swap root with 1, then
        // sift(0) over a heap of one.
        let mut s = store(&[1.0, 2.0]);
        let accesses = drive(&mut s);
        assert_eq!(
            accesses,
            vec![
                Access::new(0, AccessSite::Parent),
                Access::new(1, AccessSite::LeftChild),
                Access::new(0, AccessSite::Exchange),
                Access::new(1, AccessSite::Exchange),
                Access::new(1, AccessSite::Parent),
                Access::new(0, AccessSite::Exchange),
                Access::new(1, AccessSite::Exchange),
                Access::new(0, AccessSite::Parent),
            ]
        );
        assert_eq!(s.sort_keys(), vec![1.0, 2.0]);
    }

    #[test]
    fn ties_keep_parent() {
        let mut s = store(&[5.0, 5.0, 5.0]);
        let accesses = drive(&mut s);
        // No sift ever exchanges; only the root swaps write.
        let writes = accesses.iter().filter(|a| a.site.is_write()).count();
        assert_eq!(writes, 2 * 2);
        assert!(s.is_sorted());
    }

    #[test]
    fn right_child_probed_only_inside_heap() {
        let mut s = store(&[9.0, 8.0, 7.0, 6.0, 5.0, 4.0]);
        let accesses = drive(&mut s);
        // Final sift runs over a heap of one: only the parent read.
        assert_eq!(accesses.last(), Some(&Access::new(0, AccessSite::Parent)));
        assert!(s.is_sorted());
    }

    #[test]
    fn sorted_input_still_visits_everything() {
        let mut s = store(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let accesses = drive(&mut s);
        for i in 0..7 {
            assert!(accesses.iter().any(|a| a.index == i));
        }
        assert!(s.is_sorted());
    }

    fn sorted_pairs(store: &EntryStore) -> Vec<(f64, f64)> {
        let mut pairs: Vec<(f64, f64)> = store
            .entries()
            .iter()
            .map(|e| (e.timestamp(), e.angle()))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        pairs
    }

    #[test]
    fn settle_at_any_point_keeps_a_permutation() {
        let keys = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let input = sorted_pairs(&store(&keys));
        let total = drive(&mut store(&keys)).len();
        for stop in 0..=total {
            let mut s = store(&keys);
            let mut engine = HeapSort::new();
            for _ in 0..stop {
                engine.step(&mut s);
            }
            engine.settle(&mut s);
            assert!(engine.is_finished());
            assert_eq!(engine.step(&mut s), Step::Done);
            assert_eq!(sorted_pairs(&s), input, "settled after {stop} accesses");
        }
    }

    proptest! {
        #[test]
        fn sorts_within_bound(keys in proptest::collection::vec(0.0f64..1000.0, 0..96)) {
            let mut s = store(&keys);
            let accesses = drive(&mut s);
            prop_assert!(s.is_sorted());
            prop_assert!(accesses.len() as u64 <= HeapSort::tick_bound(keys.len() as u64));
            let mut expected = keys.clone();
            expected.sort_by(|a, b| a.total_cmp(b));
            prop_assert_eq!(s.sort_keys(), expected);
        }

        #[test]
        fn accesses_stay_in_bounds(keys in proptest::collection::vec(0.0f64..1000.0, 0..64)) {
            let mut s = store(&keys);
            for a in drive(&mut s) {
                prop_assert!(a.index < keys.len());
            }
        }
    }
}

//! In-place selection sort as a resumable state machine.
//!
//! For each pass `i`, every candidate `j > i` is read once ([`Scan`]),
//! then the pass slot is read ([`Pivot`]) and the minimum is swapped into
//! place with two value-carrying writes ([`Exchange`]). A store of length
//! `n` therefore reports exactly `n*(n-1)/2 + 3n` accesses.
//!
//! [`Scan`]: AccessSite::Scan
//! [`Pivot`]: AccessSite::Pivot
//! [`Exchange`]: AccessSite::Exchange

use aureole_core::{Access, AccessSite, EntryStore, EntryValue};

use crate::engine::{SortEngine, Step};

/// Work pending after the most recently reported access.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Cursor {
    Start,
    /// Compare candidate `j` against the running minimum.
    Compare {
        i: usize,
        j: usize,
        min: usize,
        min_key: f64,
    },
    /// Lift the minimum's value into the holder.
    Hold { i: usize, min: usize },
    /// Write the pass slot's value into the minimum slot.
    Place { i: usize, min: usize, held: EntryValue },
    /// Write the held minimum into the pass slot.
    Settle { i: usize, held: EntryValue },
    Finished,
}

/// Selection sort engine. See the [module docs](self).
#[derive(Debug)]
pub struct SelectionSort {
    cursor: Cursor,
}

impl SelectionSort {
    /// Create an engine positioned before the first pass.
    pub fn new() -> Self {
        Self {
            cursor: Cursor::Start,
        }
    }

    /// Closed-form access count for a store of length `n`.
    pub fn expected_ticks(n: u64) -> u64 {
        n * n.saturating_sub(1) / 2 + 3 * n
    }

    fn begin_pass(store: &EntryStore, i: usize) -> (Cursor, Step) {
        if i >= store.len() {
            return (Cursor::Finished, Step::Done);
        }
        Self::scan(store, i, i + 1, i, store.sort_key(i))
    }

    fn scan(store: &EntryStore, i: usize, j: usize, min: usize, min_key: f64) -> (Cursor, Step) {
        if j < store.len() {
            (
                Cursor::Compare { i, j, min, min_key },
                Step::Access(Access::new(j, AccessSite::Scan)),
            )
        } else {
            (
                Cursor::Hold { i, min },
                Step::Access(Access::new(i, AccessSite::Pivot)),
            )
        }
    }
}

impl Default for SelectionSort {
    fn default() -> Self {
        Self::new()
    }
}

impl SortEngine for SelectionSort {
    fn name(&self) -> &str {
        "selection"
    }

    fn step(&mut self, store: &mut EntryStore) -> Step {
        let (cursor, step) = match self.cursor {
            Cursor::Start => Self::begin_pass(store, 0),
            Cursor::Compare { i, j, min, min_key } => {
                let key = store.sort_key(j);
                let (min, min_key) = if key < min_key {
                    (j, key)
                } else {
                    (min, min_key)
                };
                Self::scan(store, i, j + 1, min, min_key)
            }
            Cursor::Hold { i, min } => {
                let held = store.value(min);
                (
                    Cursor::Place { i, min, held },
                    Step::Access(Access::new(min, AccessSite::Exchange)),
                )
            }
            Cursor::Place { i, min, held } => {
                store.set_value(min, store.value(i));
                (
                    Cursor::Settle { i, held },
                    Step::Access(Access::new(i, AccessSite::Exchange)),
                )
            }
            Cursor::Settle { i, held } => {
                store.set_value(i, held);
                Self::begin_pass(store, i + 1)
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
        // Only the second half of an exchange holds a value the store
        // has lost; every other cursor leaves the store a permutation.
        if let Cursor::Settle { i, held } = self.cursor {
            store.set_value(i, held);
        }
        self.cursor = Cursor::Finished;
    }
}

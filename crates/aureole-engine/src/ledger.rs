//! Bounded history of completed runs.

use indexmap::IndexMap;

use aureole_core::RunId;

use crate::run::RunSummary;

/// Completed run summaries in completion order, oldest evicted first.
#[derive(Clone, Debug)]
pub struct RunLedger {
    runs: IndexMap<RunId, RunSummary>,
    capacity: usize,
}

impl RunLedger {
    /// Create a ledger retaining at most `capacity` runs (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            runs: IndexMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a completed run, evicting the oldest if full.
    pub fn record(&mut self, summary: RunSummary) {
        if self.runs.len() == self.capacity {
            self.runs.shift_remove_index(0);
        }
        self.runs.insert(summary.run_id, summary);
    }

    /// Summary for `run`, if still retained.
    pub fn get(&self, run: RunId) -> Option<&RunSummary> {
        self.runs.get(&run)
    }

    /// The most recently completed run.
    pub fn latest(&self) -> Option<&RunSummary> {
        self.runs.last().map(|(_, s)| s)
    }

    /// Retained summaries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &RunSummary> {
        self.runs.values()
    }

    /// Number of retained runs.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Returns `true` if no run has been recorded.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

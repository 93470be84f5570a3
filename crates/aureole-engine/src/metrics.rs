//! Per-run metrics.
//!
//! [`RunMetrics`] captures the operation count and access breakdown of a
//! single run. The tick total is the step count reported to the host.

use aureole_core::{Access, AccessSite};

/// Counts and timing collected during a single run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Total scheduler ticks (one per access). The run's step count.
    pub ticks: u64,
    /// Deferrals taken to the host timer.
    pub yields: u64,
    /// Key comparisons (`Scan`, `LeftChild`, `RightChild`).
    pub comparisons: u64,
    /// Value-carrying writes (`Exchange`).
    pub writes: u64,
    /// Reads that are neither comparisons nor writes (`Pivot`, `Parent`).
    pub reads: u64,
    /// Wall-clock time from run start to end, in microseconds, including
    /// alignment and timer waits.
    pub elapsed_us: u64,
}

impl RunMetrics {
    /// Classify one access.
    pub fn record(&mut self, access: Access) {
        if access.site.is_comparison() {
            self.comparisons += 1;
        } else if access.site.is_write() {
            self.writes += 1;
        } else {
            debug_assert!(matches!(
                access.site,
                AccessSite::Pivot | AccessSite::Parent
            ));
            self.reads += 1;
        }
    }

    /// Total classified accesses. Equals `ticks` once a run has ended.
    pub fn accesses(&self) -> u64 {
        self.comparisons + self.writes + self.reads
    }
}

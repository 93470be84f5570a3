//! The step scheduler: a tick counter with a yield predicate.
//!
//! [`StepScheduler::notify`] is called once per engine access. Every
//! `batch_size`-th tick it answers [`Pace::Yield`], which the caller turns
//! into a repaint and a host timer wait; every other tick answers
//! [`Pace::Continue`] and the run proceeds synchronously. The scheduler
//! never looks at a clock, so cadence is deterministic and testable
//! without timers.

/// Ticks executed synchronously between deferrals.
pub const DEFAULT_BATCH_SIZE: u64 = 16;

/// Scheduler decision for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pace {
    /// Run the next continuation immediately.
    Continue,
    /// Repaint, then run the next continuation after the host timer.
    Yield,
}

/// Final counts handed back by [`StepScheduler::end`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerTally {
    /// Total ticks: the run's step count.
    pub ticks: u64,
    /// Number of deferrals taken.
    pub yields: u64,
}

/// Tick counter deciding when a run yields to the host.
#[derive(Clone, Debug)]
pub struct StepScheduler {
    batch_size: u64,
    ticks: u64,
    yields: u64,
}

impl StepScheduler {
    /// Create a scheduler yielding every `batch_size` ticks. A zero batch
    /// size is treated as one.
    pub fn new(batch_size: u64) -> Self {
        Self {
            batch_size: batch_size.max(1),
            ticks: 0,
            yields: 0,
        }
    }

    /// Count one tick and decide whether to continue or yield.
    pub fn notify(&mut self) -> Pace {
        self.ticks += 1;
        if self.should_yield() {
            self.yields += 1;
            Pace::Yield
        } else {
            Pace::Continue
        }
    }

    /// Whether the most recent tick landed on a batch boundary.
    pub fn should_yield(&self) -> bool {
        self.ticks != 0 && self.ticks % self.batch_size == 0
    }

    /// Ticks counted so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Deferrals taken so far.
    pub fn yields(&self) -> u64 {
        self.yields
    }

    /// Configured batch size.
    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Close the run and report its counts. Consuming `self` rules out
    /// ticks after the end.
    pub fn end(self) -> SchedulerTally {
        SchedulerTally {
            ticks: self.ticks,
            yields: self.yields,
        }
    }
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn yields_on_sixteenth_tick() {
        let mut s = StepScheduler::default();
        for _ in 0..15 {
            assert_eq!(s.notify(), Pace::Continue);
        }
        assert_eq!(s.notify(), Pace::Yield);
        assert!(s.should_yield());
        assert_eq!(s.notify(), Pace::Continue);
        assert!(!s.should_yield());
    }

    #[test]
    fn fresh_scheduler_does_not_yield() {
        let s = StepScheduler::default();
        assert!(!s.should_yield());
        assert_eq!(s.end(), SchedulerTally::default());
    }

    #[test]
    fn zero_batch_size_yields_every_tick() {
        let mut s = StepScheduler::new(0);
        assert_eq!(s.batch_size(), 1);
        assert_eq!(s.notify(), Pace::Yield);
        assert_eq!(s.notify(), Pace::Yield);
    }

    #[test]
    fn end_reports_counts() {
        let mut s = StepScheduler::default();
        for _ in 0..40 {
            s.notify();
        }
        assert_eq!(
            s.end(),
            SchedulerTally {
                ticks: 40,
                yields: 2
            }
        );
    }

    proptest! {
        #[test]
        fn one_yield_per_batch(batch in 1u64..64, ticks in 0u64..2000) {
            let mut s = StepScheduler::new(batch);
            let mut yields = 0;
            for _ in 0..ticks {
                if s.notify() == Pace::Yield {
                    yields += 1;
                }
            }
            prop_assert_eq!(yields, ticks / batch);
            prop_assert_eq!(s.yields(), ticks / batch);
            prop_assert_eq!(s.ticks(), ticks);
        }
    }
}

//! One sort run: an engine bound to a fresh scheduler.
//!
//! [`Run::start`] acquires the store's run token, so a store admits one
//! run at a time. The run then advances one tick per
//! [`advance`](Run::advance) call (or one batch per
//! [`advance_batch`](Run::advance_batch)) until the engine reports
//! completion, and [`finish`](Run::finish) releases the token and returns
//! the [`RunSummary`]. A run that errors must be handed back through
//! [`abort`](Run::abort), which settles any half-finished swap before
//! releasing the store; dropping it leaves the store held.

use std::time::Instant;

use smallvec::SmallVec;

use aureole_core::{Access, EntryStore, RunError, RunId, RunToken};
use aureole_sort::{SortEngine, SortKind, Step};

use crate::config::StageConfig;
use crate::instrument::{Instrument, VisitCounter};
use crate::metrics::RunMetrics;
use crate::scheduler::{Pace, StepScheduler};

/// Outcome of advancing a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// A tick ran and the scheduler continues synchronously.
    Continue,
    /// A tick ran on a batch boundary: repaint, wait, then advance again.
    Yield,
    /// The engine finished. Call [`Run::finish`].
    Finished,
}

/// Record of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// The run's ID.
    pub run_id: RunId,
    /// Which engine ran.
    pub kind: SortKind,
    /// Store length at run start.
    pub len: usize,
    /// Counts and timing.
    pub metrics: RunMetrics,
}

impl RunSummary {
    /// The step count reported to the host: total scheduler ticks.
    pub fn step_count(&self) -> u64 {
        self.metrics.ticks
    }
}

/// An in-flight sort run.
pub struct Run {
    token: RunToken,
    kind: SortKind,
    len: usize,
    engine: Box<dyn SortEngine>,
    scheduler: StepScheduler,
    instrument: Box<dyn Instrument>,
    metrics: RunMetrics,
    recent: SmallVec<[Access; 16]>,
    clear_recent: bool,
    max_ticks: Option<u64>,
    started: Instant,
    finished: bool,
}

impl Run {
    /// Acquire `store` and bind a fresh `kind` engine to a fresh scheduler.
    ///
    /// Visits are counted with a [`VisitCounter`] using `config.weights`;
    /// see [`with_instrument`](Self::with_instrument) to replace it.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidConfig`] if `config` fails
    /// [`StageConfig::validate`], or [`RunError::RunInProgress`] if another
    /// run holds the store. The store is untouched in both cases.
    pub fn start(
        store: &mut EntryStore,
        kind: SortKind,
        config: &StageConfig,
    ) -> Result<Self, RunError> {
        config.validate().map_err(|e| RunError::InvalidConfig {
            reason: e.to_string(),
        })?;
        let token = store.acquire()?;
        tracing::info!(
            run = %token.run_id(),
            kind = %kind,
            len = store.len(),
            "run started"
        );
        Ok(Self {
            token,
            kind,
            len: store.len(),
            engine: kind.engine(),
            scheduler: StepScheduler::new(config.batch_size),
            instrument: Box::new(VisitCounter::new(config.weights)),
            metrics: RunMetrics::default(),
            recent: SmallVec::new(),
            clear_recent: false,
            max_ticks: config.max_ticks,
            started: Instant::now(),
            finished: false,
        })
    }

    /// Replace the instrument applied to each access.
    pub fn with_instrument(mut self, instrument: Box<dyn Instrument>) -> Self {
        self.instrument = instrument;
        self
    }

    /// This run's ID.
    pub fn id(&self) -> RunId {
        self.token.run_id()
    }

    /// Which engine is running.
    pub fn kind(&self) -> SortKind {
        self.kind
    }

    /// Ticks so far.
    pub fn ticks(&self) -> u64 {
        self.scheduler.ticks()
    }

    /// Whether the engine has finished.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Accesses made since the last yield, oldest first.
    pub fn recent(&self) -> &[Access] {
        &self.recent
    }

    /// Run the pending continuation and report the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::TickBudgetExceeded`] if the engine requests a
    /// tick beyond `max_ticks`. The run must then be [aborted](Self::abort).
    pub fn advance(&mut self, store: &mut EntryStore) -> Result<Advance, RunError> {
        if self.finished {
            return Ok(Advance::Finished);
        }
        if self.clear_recent {
            self.recent.clear();
            self.clear_recent = false;
        }
        let access = match self.engine.step(store) {
            Step::Done => {
                self.finished = true;
                return Ok(Advance::Finished);
            }
            Step::Access(access) => access,
        };
        if let Some(budget) = self.max_ticks {
            if self.scheduler.ticks() >= budget {
                return Err(RunError::TickBudgetExceeded { budget });
            }
        }
        self.instrument.on_access(store, access);
        self.metrics.record(access);
        self.recent.push(access);
        match self.scheduler.notify() {
            Pace::Continue => Ok(Advance::Continue),
            Pace::Yield => {
                self.clear_recent = true;
                Ok(Advance::Yield)
            }
        }
    }

    /// Advance until the next yield or completion.
    ///
    /// Never returns [`Advance::Continue`].
    pub fn advance_batch(&mut self, store: &mut EntryStore) -> Result<Advance, RunError> {
        loop {
            match self.advance(store)? {
                Advance::Continue => continue,
                other => return Ok(other),
            }
        }
    }

    /// Drive any remaining ticks without yielding, release the store, and
    /// report the run.
    ///
    /// # Errors
    ///
    /// Propagates a tick budget overrun (after settling the engine and
    /// releasing the store) or a release failure.
    pub fn finish(mut self, store: &mut EntryStore) -> Result<RunSummary, RunError> {
        while !self.finished {
            if let Err(e) = self.advance(store) {
                self.abort(store)?;
                return Err(e);
            }
        }
        let tally = self.scheduler.end();
        let mut metrics = self.metrics;
        metrics.ticks = tally.ticks;
        metrics.yields = tally.yields;
        metrics.elapsed_us = self.started.elapsed().as_micros() as u64;
        let run_id = self.token.run_id();
        store.release(self.token)?;
        tracing::info!(
            run = %run_id,
            ticks = metrics.ticks,
            yields = metrics.yields,
            "run finished"
        );
        Ok(RunSummary {
            run_id,
            kind: self.kind,
            len: self.len,
            metrics,
        })
    }

    /// Release the store without completing the run.
    ///
    /// A swap left half-done by the last reported access is completed
    /// first, so the store keeps every entry it started with.
    pub fn abort(mut self, store: &mut EntryStore) -> Result<(), RunError> {
        self.engine.settle(store);
        tracing::warn!(
            run = %self.token.run_id(),
            ticks = self.scheduler.ticks(),
            "run aborted"
        );
        store.release(self.token)
    }
}

impl std::fmt::Debug for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Run")
            .field("id", &self.token.run_id())
            .field("kind", &self.kind)
            .field("len", &self.len)
            .field("ticks", &self.scheduler.ticks())
            .field("finished", &self.finished)
            .finish()
    }
}

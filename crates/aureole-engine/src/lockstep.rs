//! Lockstep (synchronous) stage.
//!
//! [`LockstepStage`] owns its [`EntryStore`] and drives each run to
//! completion on the caller's thread. Pacing is entirely delegated to the
//! [`Host`]: every deferral boundary becomes a [`Host::repaint`] followed
//! by a [`Host::defer`]. A host whose `defer` returns immediately turns a
//! run into a deterministic, timer-free replay of the animation.
//!
//! # Ownership model
//!
//! All mutating methods take `&mut self`, so two runs can never overlap
//! on one stage; the store's run token still guards against a run that
//! errored without releasing it.

use aureole_core::{Entry, EntryStore, RunError};
use aureole_sort::SortKind;

use crate::clock::delay_to_boundary;
use crate::config::{ConfigError, StageConfig};
use crate::host::{Frame, Host};
use crate::ledger::RunLedger;
use crate::run::{Advance, Run, RunSummary};
use crate::seed::seed_batch;

/// Single-threaded stage for synchronous sort runs.
pub struct LockstepStage {
    store: EntryStore,
    config: StageConfig,
    ledger: RunLedger,
}

impl LockstepStage {
    /// Create a stage with an empty store.
    pub fn new(config: StageConfig) -> Result<Self, ConfigError> {
        Self::with_entries(config, Vec::new())
    }

    /// Create a stage whose store holds `entries`.
    pub fn with_entries(config: StageConfig, entries: Vec<Entry>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store: EntryStore::with_entries(entries, config.interval_ms),
            ledger: RunLedger::new(config.ledger_capacity),
            config,
        })
    }

    /// The store, for rendering between runs.
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// The stage configuration.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Completed runs.
    pub fn ledger(&self) -> &RunLedger {
        &self.ledger
    }

    /// Append one entry.
    pub fn push_entry(&mut self, entry: Entry) -> Result<(), RunError> {
        self.store.push(entry)
    }

    /// Replace the store with a fresh seed batch of
    /// [`seed_count`](StageConfig::seed_count) entries, after the interval
    /// alignment wait.
    pub fn seed(&mut self, host: &mut dyn Host, seed: u64) -> Result<(), RunError> {
        self.align(host);
        let batch = seed_batch(self.config.seed_count, self.config.interval_ms, seed);
        self.store.replace(batch)?;
        tracing::debug!(seed, count = self.config.seed_count, "seed batch replaced store");
        Ok(())
    }

    /// Run `kind` over the store to completion.
    ///
    /// Sequence: acquire the store, wait for the interval boundary, stop
    /// the host frame loop, run batch by batch (repaint and defer at each
    /// boundary), release the store, restart the frame loop, and report
    /// the step count.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::RunInProgress`] if the store is still held, or
    /// [`RunError::TickBudgetExceeded`] if the run overruns `max_ticks`.
    /// The frame loop is restarted in the overrun case.
    pub fn run(&mut self, kind: SortKind, host: &mut dyn Host) -> Result<RunSummary, RunError> {
        let mut run = Run::start(&mut self.store, kind, &self.config)?;
        self.align(host);
        host.stop_frame_loop();
        loop {
            match run.advance_batch(&mut self.store) {
                Ok(Advance::Yield) => {
                    let timestamp_ms = host.now_ms();
                    host.repaint(&Frame {
                        timestamp_ms,
                        store: &self.store,
                        recent: run.recent(),
                        run: run.id(),
                        ticks: run.ticks(),
                    });
                    host.defer(self.config.defer_delay);
                }
                Ok(Advance::Finished | Advance::Continue) => break,
                Err(e) => {
                    run.abort(&mut self.store)?;
                    host.start_frame_loop();
                    return Err(e);
                }
            }
        }
        let summary = run.finish(&mut self.store)?;
        self.ledger.record(summary.clone());
        host.start_frame_loop();
        host.report_step_count(&summary);
        Ok(summary)
    }

    fn align(&self, host: &mut dyn Host) {
        if self.config.align_to_interval {
            let delay = delay_to_boundary(host.now_ms(), self.config.interval_ms);
            host.defer(delay);
        }
    }
}

impl std::fmt::Debug for LockstepStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockstepStage")
            .field("len", &self.store.len())
            .field("running", &self.store.is_running())
            .field("completed_runs", &self.ledger.len())
            .finish()
    }
}

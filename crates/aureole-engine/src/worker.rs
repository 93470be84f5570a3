//! Stage worker loop for [`RealtimeStage`](crate::RealtimeStage).
//!
//! The worker thread owns the [`Host`] exclusively (moved in via
//! `thread::spawn`) and shares the store and ledger behind mutexes. The
//! store lock is held for one batch at a time: between batches the worker
//! releases it, rejects any trigger that arrived meanwhile, and waits out
//! the host timer, so a renderer thread can read the store while a run is
//! in flight.

use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::{Receiver, Sender};

use aureole_core::{EntryStore, RunError, RunId};
use aureole_sort::SortKind;

use crate::clock::delay_to_boundary;
use crate::config::StageConfig;
use crate::host::{Frame, Host};
use crate::ledger::RunLedger;
use crate::run::{Advance, Run, RunSummary};
use crate::seed::seed_batch;

/// A trigger submitted by a user thread, paired with a reply channel.
pub(crate) enum StageCommand {
    Sort {
        kind: SortKind,
        reply: Sender<Result<RunSummary, RunError>>,
    },
    Seed {
        seed: u64,
        reply: Sender<Result<(), RunError>>,
    },
}

/// Lock a stage mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("recovering poisoned stage lock");
        poisoned.into_inner()
    })
}

/// A run in flight on the worker thread.
///
/// If the worker unwinds (a host callback panicked) the run is aborted on
/// drop, settling any half-done swap and releasing the store, so the stage
/// does not stay held by a run nobody is driving.
struct ActiveRun<'a> {
    run: Option<Run>,
    store: &'a Mutex<EntryStore>,
}

impl<'a> ActiveRun<'a> {
    fn new(run: Run, store: &'a Mutex<EntryStore>) -> Self {
        Self {
            run: Some(run),
            store,
        }
    }

    fn run(&mut self) -> Result<&mut Run, RunError> {
        self.run.as_mut().ok_or(RunError::NotRunning)
    }

    fn finish(mut self) -> Result<RunSummary, RunError> {
        let run = self.run.take().ok_or(RunError::NotRunning)?;
        run.finish(&mut lock(self.store))
    }

    fn abort(mut self) -> Result<(), RunError> {
        let run = self.run.take().ok_or(RunError::NotRunning)?;
        run.abort(&mut lock(self.store))
    }
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            if let Err(e) = run.abort(&mut lock(self.store)) {
                tracing::warn!(error = %e, "failed to release store after worker unwind");
            }
        }
    }
}

/// State held by the worker thread's main loop.
pub(crate) struct StageWorker {
    store: Arc<Mutex<EntryStore>>,
    ledger: Arc<Mutex<RunLedger>>,
    cmd_rx: Receiver<StageCommand>,
    host: Box<dyn Host + Send>,
    config: StageConfig,
}

impl StageWorker {
    pub fn new(
        store: Arc<Mutex<EntryStore>>,
        ledger: Arc<Mutex<RunLedger>>,
        cmd_rx: Receiver<StageCommand>,
        host: Box<dyn Host + Send>,
        config: StageConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            cmd_rx,
            host,
            config,
        }
    }

    /// Main loop. Runs until every command sender is dropped.
    pub fn run(mut self) {
        while let Ok(cmd) = self.cmd_rx.recv() {
            match cmd {
                StageCommand::Sort { kind, reply } => {
                    let result = self.sort(kind);
                    // Best-effort reply: the caller may have dropped its ticket.
                    let _ = reply.send(result);
                }
                StageCommand::Seed { seed, reply } => {
                    let result = self.seed(seed);
                    let _ = reply.send(result);
                }
            }
        }
        tracing::debug!("stage worker stopped");
    }

    fn sort(&mut self, kind: SortKind) -> Result<RunSummary, RunError> {
        // Acquire before the alignment wait so triggers queued behind this
        // one are rejected instead of stacking up.
        let shared = Arc::clone(&self.store);
        let run = Run::start(&mut lock(&shared), kind, &self.config)?;
        let id = run.id();
        let mut active = ActiveRun::new(run, &shared);
        self.align();
        self.reject_pending(id);
        self.host.stop_frame_loop();
        loop {
            let outcome = {
                let mut store = lock(&shared);
                let run = active.run()?;
                let outcome = run.advance_batch(&mut store);
                if let Ok(Advance::Yield) = outcome {
                    let timestamp_ms = self.host.now_ms();
                    self.host.repaint(&Frame {
                        timestamp_ms,
                        store: &store,
                        recent: run.recent(),
                        run: id,
                        ticks: run.ticks(),
                    });
                }
                outcome
            };
            match outcome {
                Ok(Advance::Yield) => {
                    self.reject_pending(id);
                    self.host.defer(self.config.defer_delay);
                }
                Ok(Advance::Finished | Advance::Continue) => break,
                Err(e) => {
                    active.abort()?;
                    self.host.start_frame_loop();
                    return Err(e);
                }
            }
        }
        let summary = active.finish()?;
        lock(&self.ledger).record(summary.clone());
        self.host.start_frame_loop();
        self.host.report_step_count(&summary);
        Ok(summary)
    }

    fn seed(&mut self, seed: u64) -> Result<(), RunError> {
        self.align();
        let batch = seed_batch(self.config.seed_count, self.config.interval_ms, seed);
        lock(&self.store).replace(batch)?;
        tracing::debug!(seed, count = self.config.seed_count, "seed batch replaced store");
        Ok(())
    }

    fn align(&mut self) {
        if self.config.align_to_interval {
            let delay = delay_to_boundary(self.host.now_ms(), self.config.interval_ms);
            self.host.defer(delay);
        }
    }

    /// Reject every trigger queued while `active` holds the store.
    fn reject_pending(&self, active: RunId) {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            tracing::warn!(run = %active, "trigger rejected: run in progress");
            let err = RunError::RunInProgress { active };
            match cmd {
                StageCommand::Sort { reply, .. } => {
                    let _ = reply.send(Err(err));
                }
                StageCommand::Seed { reply, .. } => {
                    let _ = reply.send(Err(err));
                }
            }
        }
    }
}

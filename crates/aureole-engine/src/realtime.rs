//! User-facing [`RealtimeStage`] API.
//!
//! Sort and seed triggers are sent to a dedicated worker thread that
//! drives runs against a shared store, pacing batches with the host
//! timer. The caller's thread stays free to render: it reads the store
//! through [`RealtimeStage::with_store`] whenever the worker is between
//! batches.
//!
//! ```text
//! User / render thread          Stage worker
//!     |                              |
//!     |--trigger_sort()------------->| cmd_rx.recv()
//!     |   [cmd_tx: bounded(16)]      | store.acquire()
//!     |                              | align, stop frame loop
//!     |                              | loop:
//!     |--with_store(draw)--+         |   lock; advance_batch; repaint; unlock
//!     |  (between batches) |         |   reject queued triggers
//!     |<-------------------+         |   host.defer(16 ms)
//!     |                              | finish, release, start frame loop
//!     |<--summary via Ticket---------|
//! ```

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};

use aureole_core::{Entry, EntryStore, RunError};
use aureole_sort::SortKind;

use crate::config::{ConfigError, StageConfig};
use crate::host::Host;
use crate::ledger::RunLedger;
use crate::run::RunSummary;
use crate::worker::{lock, StageCommand, StageWorker};

/// Capacity of the trigger channel.
const TRIGGER_QUEUE: usize = 16;

// ── Error types ──────────────────────────────────────────────────

/// Error submitting a trigger to the stage worker.
#[derive(Debug, PartialEq, Eq)]
pub enum TriggerError {
    /// The store is held by a run; the trigger was refused up front.
    Run(RunError),
    /// The trigger channel is full (back-pressure).
    ChannelFull,
    /// The stage worker has shut down.
    Shutdown,
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run(e) => write!(f, "trigger refused: {e}"),
            Self::ChannelFull => write!(f, "trigger channel full"),
            Self::Shutdown => write!(f, "stage worker has shut down"),
        }
    }
}

impl Error for TriggerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Run(e) => Some(e),
            _ => None,
        }
    }
}

// ── Ticket ───────────────────────────────────────────────────────

/// Handle on the outcome of an accepted trigger.
#[derive(Debug)]
pub struct Ticket<T> {
    rx: Receiver<Result<T, RunError>>,
}

impl<T> Ticket<T> {
    /// Block until the worker replies.
    ///
    /// Returns [`RunError::StageShutDown`] if the worker exits without
    /// replying.
    pub fn wait(self) -> Result<T, RunError> {
        self.rx.recv().unwrap_or(Err(RunError::StageShutDown))
    }

    /// Block for at most `timeout`. `None` if no reply arrived in time.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T, RunError>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(RunError::StageShutDown)),
        }
    }

    /// The reply, if it has already arrived.
    pub fn try_get(&self) -> Option<Result<T, RunError>> {
        self.rx.try_recv().ok()
    }
}

// ── RealtimeStage ────────────────────────────────────────────────

/// Stage running sorts on a background worker thread.
pub struct RealtimeStage {
    store: Arc<Mutex<EntryStore>>,
    ledger: Arc<Mutex<RunLedger>>,
    cmd_tx: Option<Sender<StageCommand>>,
    worker: Option<JoinHandle<()>>,
    config: StageConfig,
}

impl RealtimeStage {
    /// Create a stage with an empty store and spawn its worker.
    ///
    /// The `host` is moved to the worker thread; it receives repaints,
    /// timer waits, frame loop controls, and step counts from there.
    pub fn new<H>(config: StageConfig, host: H) -> Result<Self, ConfigError>
    where
        H: Host + Send + 'static,
    {
        Self::with_entries(config, Vec::new(), host)
    }

    /// Create a stage whose store holds `entries` and spawn its worker.
    pub fn with_entries<H>(
        config: StageConfig,
        entries: Vec<Entry>,
        host: H,
    ) -> Result<Self, ConfigError>
    where
        H: Host + Send + 'static,
    {
        config.validate()?;
        let store = Arc::new(Mutex::new(EntryStore::with_entries(
            entries,
            config.interval_ms,
        )));
        let ledger = Arc::new(Mutex::new(RunLedger::new(config.ledger_capacity)));
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(TRIGGER_QUEUE);

        let worker_state = StageWorker::new(
            Arc::clone(&store),
            Arc::clone(&ledger),
            cmd_rx,
            Box::new(host),
            config.clone(),
        );
        let worker = thread::Builder::new()
            .name("aureole-stage".into())
            .spawn(move || worker_state.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("stage worker: {e}"),
            })?;

        Ok(Self {
            store,
            ledger,
            cmd_tx: Some(cmd_tx),
            worker: Some(worker),
            config,
        })
    }

    /// Trigger a `kind` run.
    ///
    /// # Errors
    ///
    /// Refused with [`TriggerError::Shutdown`] once the worker has exited,
    /// or with [`TriggerError::Run`] if a run already holds the store. A
    /// trigger that races past this check is rejected by the worker and
    /// its ticket resolves to [`RunError::RunInProgress`].
    pub fn trigger_sort(&self, kind: SortKind) -> Result<Ticket<RunSummary>, TriggerError> {
        self.ensure_alive()?;
        self.ensure_idle()?;
        let (reply, rx) = crossbeam_channel::bounded(1);
        self.send(StageCommand::Sort { kind, reply })?;
        Ok(Ticket { rx })
    }

    /// Trigger a wholesale reseed of the store.
    ///
    /// # Errors
    ///
    /// Same refusal rules as [`trigger_sort`](Self::trigger_sort).
    pub fn trigger_seed(&self, seed: u64) -> Result<Ticket<()>, TriggerError> {
        self.ensure_alive()?;
        self.ensure_idle()?;
        let (reply, rx) = crossbeam_channel::bounded(1);
        self.send(StageCommand::Seed { seed, reply })?;
        Ok(Ticket { rx })
    }

    /// Read the store. Blocks while the worker is inside a batch.
    pub fn with_store<R>(&self, f: impl FnOnce(&EntryStore) -> R) -> R {
        f(&lock(&self.store))
    }

    /// Append one entry. Refused while a run holds the store.
    pub fn push_entry(&self, entry: Entry) -> Result<(), RunError> {
        lock(&self.store).push(entry)
    }

    /// Whether a run currently holds the store.
    pub fn is_running(&self) -> bool {
        lock(&self.store).is_running()
    }

    /// Completed run summaries, oldest first.
    pub fn ledger(&self) -> Vec<RunSummary> {
        lock(&self.ledger).iter().cloned().collect()
    }

    /// The stage configuration.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Stop accepting triggers, let the worker finish its current command,
    /// and join it. Returns `true` if the worker was joined cleanly.
    /// Idempotent.
    pub fn shutdown(&mut self) -> bool {
        self.cmd_tx.take();
        match self.worker.take() {
            Some(handle) => handle.join().is_ok(),
            None => true,
        }
    }

    /// The worker exits on shutdown, or early if a host callback panics.
    fn ensure_alive(&self) -> Result<(), TriggerError> {
        match &self.worker {
            Some(handle) if !handle.is_finished() => Ok(()),
            _ => Err(TriggerError::Shutdown),
        }
    }

    fn ensure_idle(&self) -> Result<(), TriggerError> {
        match lock(&self.store).active_run() {
            Some(active) => Err(TriggerError::Run(RunError::RunInProgress { active })),
            None => Ok(()),
        }
    }

    fn send(&self, cmd: StageCommand) -> Result<(), TriggerError> {
        let tx = self.cmd_tx.as_ref().ok_or(TriggerError::Shutdown)?;
        tx.try_send(cmd).map_err(|e| match e {
            TrySendError::Full(_) => TriggerError::ChannelFull,
            TrySendError::Disconnected(_) => TriggerError::Shutdown,
        })
    }
}

impl Drop for RealtimeStage {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for RealtimeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeStage")
            .field("running", &self.is_running())
            .field("shut_down", &self.ensure_alive().is_err())
            .finish()
    }
}

//! Step scheduler and stages driving Aureole sort animations.
//!
//! A [`Run`] binds one [`SortEngine`](aureole_sort::SortEngine) to a fresh
//! [`StepScheduler`] and an [`Instrument`]. Each engine access is one tick;
//! every `batch_size` ticks the scheduler yields so the host can repaint
//! and wait out its timer before the run resumes.
//!
//! Two stages host runs:
//!
//! - [`LockstepStage`]: owns the store and drives a run to completion on
//!   the caller's thread, delegating repaint and timer waits to a [`Host`].
//! - [`RealtimeStage`]: drives runs on a dedicated worker thread, holding
//!   the store lock one batch at a time so a renderer can read it between
//!   batches. Triggers that arrive while a run is in flight are rejected.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod host;
pub mod instrument;
pub mod ledger;
pub mod lockstep;
pub mod metrics;
pub mod realtime;
pub mod run;
pub mod scheduler;
pub mod seed;
mod worker;

pub use config::{ConfigError, StageConfig};
pub use host::{Frame, HeadlessHost, Host};
pub use instrument::{Instrument, Silent, VisitCounter};
pub use ledger::RunLedger;
pub use lockstep::LockstepStage;
pub use metrics::RunMetrics;
pub use realtime::{RealtimeStage, Ticket, TriggerError};
pub use run::{Advance, Run, RunSummary};
pub use scheduler::{Pace, SchedulerTally, StepScheduler, DEFAULT_BATCH_SIZE};
pub use seed::seed_batch;

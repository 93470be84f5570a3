//! Test utilities and mock hosts for Aureole development.
//!
//! Provides [`RecordingHost`], a [`Host`] that records every call instead
//! of drawing or sleeping, and store fixtures built from plain key lists.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{descending_keys, entries_from_keys, store_from_keys};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use aureole_core::{Access, RunId};
use aureole_engine::{Frame, Host, RunSummary};

/// One recorded [`Host::repaint`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct RepaintRecord {
    pub timestamp_ms: f64,
    pub run: RunId,
    pub ticks: u64,
    pub keys: Vec<f64>,
    pub visits: Vec<u32>,
    pub recent: Vec<Access>,
}

/// Host calls in the order they happened.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    Repaint { ticks: u64 },
    Defer(Duration),
    StopFrameLoop,
    StartFrameLoop,
    Report { steps: u64 },
}

/// Everything a [`RecordingHost`] has seen.
#[derive(Clone, Debug, Default)]
pub struct HostLog {
    pub events: Vec<HostEvent>,
    pub repaints: Vec<RepaintRecord>,
    pub reports: Vec<RunSummary>,
    pub frame_loop_running: bool,
}

impl HostLog {
    /// Delays passed to `defer`, in call order.
    pub fn defers(&self) -> Vec<Duration> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Defer(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    /// Number of frame loop stop calls.
    pub fn stops(&self) -> usize {
        self.count(|e| matches!(e, HostEvent::StopFrameLoop))
    }

    /// Number of frame loop start calls.
    pub fn starts(&self) -> usize {
        self.count(|e| matches!(e, HostEvent::StartFrameLoop))
    }

    fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

/// A [`Host`] that records calls and never sleeps.
///
/// Clones share one log, so a test can keep a handle while the host
/// itself is moved into a stage worker. The clock is fixed at
/// [`now_ms`](RecordingHost::with_now) (default `0.5`) so interval
/// alignment produces a predictable delay.
#[derive(Clone, Debug)]
pub struct RecordingHost {
    log: Arc<Mutex<HostLog>>,
    now_ms: f64,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(HostLog {
                frame_loop_running: true,
                ..HostLog::default()
            })),
            now_ms: 0.5,
        }
    }

    /// Fix the host clock at `now_ms`.
    pub fn with_now(mut self, now_ms: f64) -> Self {
        self.now_ms = now_ms;
        self
    }

    /// Snapshot of the log so far.
    pub fn log(&self) -> HostLog {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HostLog> {
        self.log.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for RecordingHost {
    fn repaint(&mut self, frame: &Frame<'_>) {
        let record = RepaintRecord {
            timestamp_ms: frame.timestamp_ms,
            run: frame.run,
            ticks: frame.ticks,
            keys: frame.store.sort_keys(),
            visits: frame.store.entries().iter().map(|e| e.visits).collect(),
            recent: frame.recent.to_vec(),
        };
        let mut log = self.lock();
        log.events.push(HostEvent::Repaint { ticks: frame.ticks });
        log.repaints.push(record);
    }

    fn defer(&mut self, delay: Duration) {
        self.lock().events.push(HostEvent::Defer(delay));
    }

    fn stop_frame_loop(&mut self) {
        let mut log = self.lock();
        log.events.push(HostEvent::StopFrameLoop);
        log.frame_loop_running = false;
    }

    fn start_frame_loop(&mut self) {
        let mut log = self.lock();
        log.events.push(HostEvent::StartFrameLoop);
        log.frame_loop_running = true;
    }

    fn report_step_count(&mut self, summary: &RunSummary) {
        let mut log = self.lock();
        log.events.push(HostEvent::Report {
            steps: summary.step_count(),
        });
        log.reports.push(summary.clone());
    }

    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

//! The host collaborator contract.
//!
//! The core never draws and never owns a frame loop. A stage talks to its
//! surroundings through [`Host`]: repaint on each deferral boundary, wait
//! out the host timer, stop the idle repaint loop before a run and restart
//! it after, and receive the final step count.

use std::thread;
use std::time::Duration;

use aureole_core::{Access, EntryStore, RunId};

use crate::clock;
use crate::run::RunSummary;

/// What a host repaint sees.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Repaint timestamp in milliseconds since the Unix epoch.
    pub timestamp_ms: f64,
    /// The store, mid-run.
    pub store: &'a EntryStore,
    /// Accesses made during the batch that just ended, oldest first.
    pub recent: &'a [Access],
    /// The run being animated.
    pub run: RunId,
    /// Ticks so far in this run.
    pub ticks: u64,
}

/// Rendering surface, host timer, frame loop, and step count sink.
pub trait Host {
    /// Paint an intermediate frame on a deferral boundary.
    fn repaint(&mut self, frame: &Frame<'_>);

    /// Block until the host timer fires after `delay`.
    fn defer(&mut self, delay: Duration);

    /// Stop the idle repaint loop. Called before a run touches the store.
    fn stop_frame_loop(&mut self);

    /// Restart the idle repaint loop. Called once a run has ended.
    fn start_frame_loop(&mut self);

    /// Receive the step count of a completed run.
    fn report_step_count(&mut self, summary: &RunSummary);

    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> f64 {
        clock::now_ms()
    }
}

/// A host with no surface: sleeps on [`defer`](Host::defer) and keeps
/// only counters. Suitable for command-line drivers and benchmarks.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    /// Repaints requested so far.
    pub repaints: u64,
    /// Whether the idle frame loop is running.
    pub frame_loop_running: bool,
    /// Step count of the most recent completed run.
    pub last_step_count: Option<u64>,
}

impl Host for HeadlessHost {
    fn repaint(&mut self, _frame: &Frame<'_>) {
        self.repaints += 1;
    }

    fn defer(&mut self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    fn stop_frame_loop(&mut self) {
        self.frame_loop_running = false;
    }

    fn start_frame_loop(&mut self) {
        self.frame_loop_running = true;
    }

    fn report_step_count(&mut self, summary: &RunSummary) {
        self.last_step_count = Some(summary.step_count());
    }
}

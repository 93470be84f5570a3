//! Aureole lockstep demo: seed a store, sort it, print each frame.
//!
//! Demonstrates:
//!   1. Building a StageConfig and LockstepStage
//!   2. Implementing a Host that renders frames as text
//!   3. Seeding, running both engines, and reading the ledger
//!
//! Run with:
//!   cargo run --example lockstep_demo

use std::time::Duration;

use aureole_core::AccessSite;
use aureole_engine::{Frame, Host, LockstepStage, RunSummary, StageConfig};
use aureole_sort::SortKind;

// ─── Text host ──────────────────────────────────────────────────

/// Prints one bar per entry, scaled to its sort key, with a marker on
/// every slot touched during the last batch.
struct TextHost {
    width: usize,
    interval: f64,
}

impl Host for TextHost {
    fn repaint(&mut self, frame: &Frame<'_>) {
        println!("-- run {} tick {} --", frame.run, frame.ticks);
        for (i, entry) in frame.store.entries().iter().enumerate() {
            let key = frame.store.sort_key(i);
            let len = ((key / self.interval) * self.width as f64).round() as usize;
            let marker = match frame.recent.iter().rev().find(|a| a.index == i) {
                Some(a) if a.site == AccessSite::Exchange => '*',
                Some(_) => '+',
                None => ' ',
            };
            println!(
                "{marker} {:>6.1} {:<width$} visits={}",
                key,
                "#".repeat(len),
                entry.visits,
                width = self.width
            );
        }
    }

    fn defer(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }

    fn stop_frame_loop(&mut self) {}

    fn start_frame_loop(&mut self) {}

    fn report_step_count(&mut self, summary: &RunSummary) {
        println!(
            "{} finished in {} steps ({} comparisons, {} writes)",
            summary.kind, summary.metrics.ticks, summary.metrics.comparisons, summary.metrics.writes
        );
    }
}

fn main() {
    let config = StageConfig {
        seed_count: 12,
        batch_size: 8,
        defer_delay: Duration::from_millis(50),
        align_to_interval: false,
        ..StageConfig::default()
    };
    let mut host = TextHost {
        width: 40,
        interval: config.interval_ms,
    };
    let mut stage = match LockstepStage::new(config) {
        Ok(stage) => stage,
        Err(e) => {
            eprintln!("invalid config: {e}");
            std::process::exit(1);
        }
    };

    for (seed, kind) in [(1, SortKind::Selection), (2, SortKind::Heap)] {
        if let Err(e) = stage.seed(&mut host, seed) {
            eprintln!("seed failed: {e}");
            std::process::exit(1);
        }
        if let Err(e) = stage.run(kind, &mut host) {
            eprintln!("{kind} run failed: {e}");
            std::process::exit(1);
        }
    }

    println!();
    for summary in stage.ledger().iter() {
        println!(
            "{:>10} n={:<4} steps={:<6} yields={}",
            summary.kind.name(),
            summary.len,
            summary.step_count(),
            summary.metrics.yields
        );
    }
}

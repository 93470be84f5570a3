//! Aureole: step-scheduled sort animations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Aureole sub-crates. Adding `aureole` as a single dependency is
//! enough for most users.
//!
//! # Quick start
//!
//! ```rust
//! use aureole::prelude::*;
//!
//! let config = StageConfig {
//!     align_to_interval: false,
//!     defer_delay: std::time::Duration::ZERO,
//!     ..StageConfig::default()
//! };
//! let entries = [3.0, 1.0, 4.0, 2.0]
//!     .iter()
//!     .map(|&ts| Entry::new(0.0, ts))
//!     .collect();
//! let mut stage = LockstepStage::with_entries(config, entries).unwrap();
//! let mut host = HeadlessHost::default();
//!
//! let summary = stage.run(SortKind::Selection, &mut host).unwrap();
//! assert_eq!(summary.step_count(), 18);
//! assert!(stage.store().is_sorted());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `aureole-core` | Entries, the store and its run guard, accesses, errors |
//! | [`sort`] | `aureole-sort` | Selection and heap sort engines |
//! | [`engine`] | `aureole-engine` | Scheduler, runs, and the lockstep and realtime stages |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`aureole-core`).
///
/// [`types::EntryStore`] holds the entries a run sorts and hands out the
/// [`types::RunToken`] that keeps a second run off it.
pub use aureole_core as types;

/// Sort engines (`aureole-sort`).
///
/// [`sort::SelectionSort`] and [`sort::HeapSort`] implement
/// [`sort::SortEngine`]; [`sort::SortKind`] picks one by name.
pub use aureole_sort as sort;

/// Scheduler and stages (`aureole-engine`).
///
/// [`engine::LockstepStage`] runs on the caller's thread,
/// [`engine::RealtimeStage`] on a background worker.
pub use aureole_engine as engine;

/// Common imports for typical Aureole usage.
pub mod prelude {
    // Core types
    pub use aureole_core::{Access, AccessSite, Entry, EntryStore, RunError, RunId, VisitWeights};

    // Engines
    pub use aureole_sort::{SortEngine, SortKind};

    // Stages and hosts
    pub use aureole_engine::{
        ConfigError, Frame, HeadlessHost, Host, LockstepStage, RealtimeStage, RunSummary,
        StageConfig, TriggerError,
    };
}

//! The [`SortEngine`] trait.

use aureole_core::{Access, EntryStore};

/// Outcome of one [`SortEngine::step`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The engine is about to work on a slot. The caller instruments the
    /// access and consults its scheduler before stepping again; the work
    /// itself happens on the next call.
    Access(Access),
    /// The store is sorted. Every later call returns `Done` again.
    Done,
}

/// A sort algorithm expressed as a resumable state machine.
///
/// Implementations must report an [`Access`] for every key read and
/// every value write, and must reach [`Step::Done`] after a finite number
/// of steps for any store length. Engines never touch visit counters;
/// instrumentation belongs to the caller.
///
/// The store length must not change between `step` calls. Callers hold
/// a [`RunToken`](aureole_core::RunToken) for the duration of a run,
/// which refuses pushes and reseeds.
pub trait SortEngine: Send {
    /// Human-readable engine name.
    fn name(&self) -> &str;

    /// Finish pending work and report the next access.
    fn step(&mut self, store: &mut EntryStore) -> Step;

    /// Whether [`Step::Done`] has been reported.
    fn is_finished(&self) -> bool;

    /// Abandon the run, completing any value write left pending by the
    /// last reported access. No further access is reported. Afterwards the
    /// store holds a permutation of the values it held at the start of
    /// the run and the engine is finished.
    fn settle(&mut self, store: &mut EntryStore);
}

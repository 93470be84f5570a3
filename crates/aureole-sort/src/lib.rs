//! Step-yielding sort engines for Aureole.
//!
//! Each engine is an explicit state machine implementing [`SortEngine`].
//! One call to [`SortEngine::step`] finishes the work left pending by the
//! previous access and reports the next [`Access`](aureole_core::Access),
//! or [`Step::Done`] once the store is sorted. Stack depth is independent
//! of the input length.
//!
//! Two engines are provided:
//!
//! - [`SelectionSort`]: in-place selection sort, `n*(n-1)/2 + 3n` accesses.
//! - [`HeapSort`]: max-heap build then extraction, `O(n log n)` accesses.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod heap;
pub mod kind;
pub mod selection;

pub use engine::{SortEngine, Step};
pub use heap::HeapSort;
pub use kind::{SortKind, UnknownSortKind};
pub use selection::SelectionSort;

//! Core types for the Aureole sort animation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the datum every sort engine operates on ([`EntryStore`] of [`Entry`]),
//! the run guard that keeps two runs off the same store, the [`Access`]
//! records engines report for instrumentation, and the error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod access;
pub mod entry;
pub mod error;
pub mod id;
pub mod store;

pub use access::{Access, AccessSite, VisitWeights};
pub use entry::{Entry, EntryValue};
pub use error::RunError;
pub use id::RunId;
pub use store::{EntryStore, RunToken, DEFAULT_INTERVAL};

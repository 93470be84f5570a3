//! Strongly-typed run identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`RunId`] allocation.
static RUN_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one sort run, from acquisition of the store to `end()`.
///
/// Allocated from a monotonic atomic counter via [`RunId::next`]. Two
/// runs within one process never share an ID, so a stale
/// [`RunToken`](crate::RunToken) can always be told apart from the
/// current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    /// Allocate a fresh, unique run ID. Thread-safe.
    pub fn next() -> Self {
        Self(RUN_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = RunId::next();
        let b = RunId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn display_is_raw_value() {
        let id = RunId::next();
        assert_eq!(id.to_string(), id.get().to_string());
    }
}

//! Selecting an engine by name.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::engine::SortEngine;
use crate::heap::HeapSort;
use crate::selection::SelectionSort;

/// The available sort engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// [`SelectionSort`].
    Selection,
    /// [`HeapSort`].
    Heap,
}

impl SortKind {
    /// Every kind, in trigger order.
    pub const ALL: [SortKind; 2] = [SortKind::Heap, SortKind::Selection];

    /// Stable lowercase name, matching [`SortEngine::name`].
    pub fn name(self) -> &'static str {
        match self {
            SortKind::Selection => "selection",
            SortKind::Heap => "heap",
        }
    }

    /// Build a fresh engine of this kind.
    pub fn engine(self) -> Box<dyn SortEngine> {
        match self {
            SortKind::Selection => Box::new(SelectionSort::new()),
            SortKind::Heap => Box::new(HeapSort::new()),
        }
    }
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sort name that matches no [`SortKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSortKind {
    /// The unrecognized name.
    pub name: String,
}

impl fmt::Display for UnknownSortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort '{}'", self.name)
    }
}

impl Error for UnknownSortKind {}

impl FromStr for SortKind {
    type Err = UnknownSortKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selection" | "ssort" => Ok(SortKind::Selection),
            "heap" | "hsort" => Ok(SortKind::Heap),
            _ => Err(UnknownSortKind { name: s.into() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_name_matches_kind() {
        for kind in SortKind::ALL {
            assert_eq!(kind.engine().name(), kind.name());
        }
    }

    #[test]
    fn parse_accepts_short_names() {
        assert_eq!("ssort".parse(), Ok(SortKind::Selection));
        assert_eq!(" Heap ".parse(), Ok(SortKind::Heap));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "quick".parse::<SortKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown sort 'quick'");
    }

    #[test]
    fn fresh_engines_are_not_finished() {
        for kind in SortKind::ALL {
            assert!(!kind.engine().is_finished());
        }
    }
}

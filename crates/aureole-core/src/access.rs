//! Access records reported by sort engines, and the visit weights that
//! turn them into visual emphasis.

use std::fmt;

/// Where in an algorithm an access happens.
///
/// Engines tag every reported [`Access`] with a site so instrumentation
/// can weight and classify accesses without the engine knowing anything
/// about visit counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessSite {
    /// Selection sort: a candidate read during the minimum scan.
    Scan,
    /// Selection sort: the pass slot, read before the value swap.
    Pivot,
    /// A value-carrying write (selection swap or heap exchange).
    Exchange,
    /// Heap sort: the sift-down parent read.
    Parent,
    /// Heap sort: the left child comparison.
    LeftChild,
    /// Heap sort: the right child comparison.
    RightChild,
}

impl AccessSite {
    /// All sites, in declaration order.
    pub const ALL: [AccessSite; 6] = [
        AccessSite::Scan,
        AccessSite::Pivot,
        AccessSite::Exchange,
        AccessSite::Parent,
        AccessSite::LeftChild,
        AccessSite::RightChild,
    ];

    /// Whether the access is a key comparison against a running best.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            AccessSite::Scan | AccessSite::LeftChild | AccessSite::RightChild
        )
    }

    /// Whether the access writes a value into the slot.
    pub fn is_write(self) -> bool {
        matches!(self, AccessSite::Exchange)
    }
}

impl fmt::Display for AccessSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessSite::Scan => "scan",
            AccessSite::Pivot => "pivot",
            AccessSite::Exchange => "exchange",
            AccessSite::Parent => "parent",
            AccessSite::LeftChild => "left-child",
            AccessSite::RightChild => "right-child",
        };
        f.write_str(name)
    }
}

/// One instrumented access: the slot an engine is about to work on, and
/// why.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Access {
    /// Index of the slot in the store.
    pub index: usize,
    /// The algorithm site performing the access.
    pub site: AccessSite,
}

impl Access {
    /// Create an access record.
    pub fn new(index: usize, site: AccessSite) -> Self {
        Self { index, site }
    }
}

/// Per-access visit counter increments.
///
/// Every access bumps its slot's visit counter by [`access`](Self::access),
/// except the heap sort left-child comparison, which bumps by
/// [`left_child`](Self::left_child). The defaults (2 and 1) reproduce the
/// uneven weighting the animation has always shown; whether the lighter
/// left-child cue is intentional is undecided, so it is configurable
/// rather than normalized. Use [`uniform`](Self::uniform) for even
/// weighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitWeights {
    /// Increment for every access other than a left-child comparison.
    pub access: u32,
    /// Increment for a heap sort left-child comparison.
    pub left_child: u32,
}

impl VisitWeights {
    /// The same increment at every site.
    pub fn uniform(weight: u32) -> Self {
        Self {
            access: weight,
            left_child: weight,
        }
    }

    /// Increment to apply for an access at `site`.
    pub fn weight(&self, site: AccessSite) -> u32 {
        match site {
            AccessSite::LeftChild => self.left_child,
            _ => self.access,
        }
    }

    /// Whether the two sites would be weighted differently.
    pub fn is_uniform(&self) -> bool {
        self.access == self.left_child
    }
}

impl Default for VisitWeights {
    fn default() -> Self {
        Self {
            access: 2,
            left_child: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_keep_lighter_left_child() {
        let w = VisitWeights::default();
        assert_eq!(w.weight(AccessSite::Parent), 2);
        assert_eq!(w.weight(AccessSite::RightChild), 2);
        assert_eq!(w.weight(AccessSite::LeftChild), 1);
        assert!(!w.is_uniform());
    }

    #[test]
    fn uniform_weights_apply_everywhere() {
        let w = VisitWeights::uniform(3);
        for site in AccessSite::ALL {
            assert_eq!(w.weight(site), 3);
        }
        assert!(w.is_uniform());
    }

    #[test]
    fn site_classification() {
        let comparisons: Vec<_> = AccessSite::ALL
            .into_iter()
            .filter(|s| s.is_comparison())
            .collect();
        assert_eq!(
            comparisons,
            vec![AccessSite::Scan, AccessSite::LeftChild, AccessSite::RightChild]
        );
        assert!(AccessSite::Exchange.is_write());
        assert!(!AccessSite::Pivot.is_write());
        assert!(!AccessSite::Pivot.is_comparison());
    }

    #[test]
    fn site_display() {
        assert_eq!(AccessSite::LeftChild.to_string(), "left-child");
        assert_eq!(AccessSite::Exchange.to_string(), "exchange");
    }
}

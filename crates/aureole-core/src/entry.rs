//! The animated element and the payload that sorts move between slots.

/// The part of an [`Entry`] that sort engines move.
///
/// Swaps and writes carry an `EntryValue` from one slot to another; the
/// visit counter stays with the slot so the renderer can show where the
/// algorithm has been, not what it has carried.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntryValue {
    /// Position angle in radians.
    pub angle: f64,
    /// Creation timestamp. The sort key is this value reduced modulo the
    /// store interval.
    pub timestamp: f64,
}

impl EntryValue {
    /// Create a value from an angle and a creation timestamp.
    pub fn new(angle: f64, timestamp: f64) -> Self {
        Self { angle, timestamp }
    }

    /// Sort key for this value: `timestamp mod interval`, always in
    /// `[0, interval)` for a positive interval.
    pub fn sort_key(&self, interval: f64) -> f64 {
        let key = self.timestamp.rem_euclid(interval);
        // rem_euclid rounds tiny negatives up to `interval` itself.
        if key >= interval {
            0.0
        } else {
            key
        }
    }
}

/// One animated element of an [`EntryStore`](crate::EntryStore).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    /// The sortable payload.
    pub value: EntryValue,
    /// Weighted count of algorithm accesses to this slot. Visual only.
    pub visits: u32,
}

impl Entry {
    /// Create an unvisited entry.
    pub fn new(angle: f64, timestamp: f64) -> Self {
        Self {
            value: EntryValue::new(angle, timestamp),
            visits: 0,
        }
    }

    /// Create an entry from a pointer offset relative to the centre of
    /// the rendering surface.
    ///
    /// The angle is `acos(dx / distance)` signed by `dy`, so points below
    /// the centre (positive `dy` in screen coordinates) get positive
    /// angles. A pointer exactly on the centre yields angle `0`.
    pub fn from_pointer(dx: f64, dy: f64, timestamp: f64) -> Self {
        let distance = dx.hypot(dy);
        let angle = if distance == 0.0 {
            0.0
        } else {
            (dx / distance).clamp(-1.0, 1.0).acos() * sign(dy)
        };
        Self::new(angle, timestamp)
    }

    /// Position angle in radians.
    pub fn angle(&self) -> f64 {
        self.value.angle
    }

    /// Creation timestamp.
    pub fn timestamp(&self) -> f64 {
        self.value.timestamp
    }

    /// Sort key under the given interval.
    pub fn sort_key(&self, interval: f64) -> f64 {
        self.value.sort_key(interval)
    }
}

// `f64::signum` maps 0.0 to 1.0. Here zero stays zero, so the whole
// horizontal axis collapses to angle 0.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn sort_key_wraps_timestamp() {
        let e = Entry::new(0.0, 2350.0);
        assert!((e.sort_key(1000.0) - 350.0).abs() < 1e-9);
    }

    #[test]
    fn sort_key_of_negative_timestamp_is_non_negative() {
        let e = Entry::new(0.0, -250.0);
        assert!((e.sort_key(1000.0) - 750.0).abs() < 1e-9);
    }

    #[test]
    fn new_entry_is_unvisited() {
        let e = Entry::new(1.0, 2.0);
        assert_eq!(e.visits, 0);
        assert_eq!(e.angle(), 1.0);
        assert_eq!(e.timestamp(), 2.0);
    }

    #[test]
    fn pointer_below_centre_has_positive_angle() {
        let e = Entry::from_pointer(0.0, 10.0, 0.0);
        assert!((e.angle() - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn pointer_above_centre_has_negative_angle() {
        let e = Entry::from_pointer(0.0, -10.0, 0.0);
        assert!((e.angle() + FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn pointer_on_axis_has_zero_sign() {
        assert_eq!(Entry::from_pointer(5.0, 0.0, 0.0).angle(), 0.0);
        // acos(-1) is PI, but the zero sign collapses it.
        assert_eq!(Entry::from_pointer(-5.0, 0.0, 0.0).angle().abs(), 0.0);
    }

    #[test]
    fn pointer_left_and_below_is_obtuse() {
        let e = Entry::from_pointer(-1.0, 1.0, 0.0);
        assert!((e.angle() - 3.0 * PI / 4.0).abs() < 1e-9);
    }

    #[test]
    fn pointer_on_centre_is_zero() {
        assert_eq!(Entry::from_pointer(0.0, 0.0, 0.0).angle(), 0.0);
    }
}

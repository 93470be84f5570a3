//! Wall-clock helpers for repaint timestamps and trigger alignment.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch. A clock set before the epoch
/// reads as `0`.
pub fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Delay from `now_ms` until the next multiple of `interval_ms`.
///
/// A timestamp exactly on a boundary waits a full interval, so a trigger
/// always lands on the boundary after the one it was issued in.
pub fn delay_to_boundary(now_ms: f64, interval_ms: f64) -> Duration {
    if !interval_ms.is_finite() || interval_ms <= 0.0 {
        return Duration::ZERO;
    }
    let remaining = interval_ms - now_ms.rem_euclid(interval_ms);
    Duration::from_secs_f64(remaining.clamp(0.0, interval_ms) / 1000.0)
}

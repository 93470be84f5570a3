//! Stage configuration, validation, and error types.
//!
//! [`StageConfig`] is the builder-input for both stages.
//! [`validate()`](StageConfig::validate) checks structural invariants at
//! construction; stages refuse to start with an invalid configuration.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use aureole_core::{VisitWeights, DEFAULT_INTERVAL};

use crate::scheduler::DEFAULT_BATCH_SIZE;

/// Default host timer delay between batches.
pub const DEFAULT_DEFER_DELAY: Duration = Duration::from_millis(16);

/// Default number of entries in a seed batch.
pub const DEFAULT_SEED_COUNT: usize = 128;

// ── StageConfig ────────────────────────────────────────────────────

/// Configuration shared by [`LockstepStage`](crate::LockstepStage) and
/// [`RealtimeStage`](crate::RealtimeStage).
#[derive(Clone, Debug)]
pub struct StageConfig {
    /// Ticks executed synchronously between deferrals. Default: 16.
    pub batch_size: u64,
    /// Host timer delay taken at each deferral. Default: 16 ms.
    pub defer_delay: Duration,
    /// Sort-key modulus and trigger alignment interval, in
    /// milliseconds. Default: 1000.
    pub interval_ms: f64,
    /// Entries per seed batch. Default: 128.
    pub seed_count: usize,
    /// Visit counter increments per access site.
    pub weights: VisitWeights,
    /// Delay run and seed triggers to the next interval boundary.
    /// Default: `true`.
    pub align_to_interval: bool,
    /// Tick budget after which a run is aborted. `None` = unbounded.
    pub max_ticks: Option<u64>,
    /// Completed run summaries retained by the ledger. Default: 64.
    pub ledger_capacity: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            defer_delay: DEFAULT_DEFER_DELAY,
            interval_ms: DEFAULT_INTERVAL,
            seed_count: DEFAULT_SEED_COUNT,
            weights: VisitWeights::default(),
            align_to_interval: true,
            max_ticks: None,
            ledger_capacity: 64,
        }
    }
}

impl StageConfig {
    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::BatchSizeZero);
        }
        if !self.interval_ms.is_finite() || self.interval_ms <= 0.0 {
            return Err(ConfigError::InvalidInterval {
                value: self.interval_ms,
            });
        }
        if self.seed_count == 0 {
            return Err(ConfigError::SeedCountZero);
        }
        if self.weights.access == 0 || self.weights.left_child == 0 {
            return Err(ConfigError::InvalidWeights {
                reason: format!(
                    "every site must bump visits, got access={} left_child={}",
                    self.weights.access, self.weights.left_child
                ),
            });
        }
        if self.max_ticks == Some(0) {
            return Err(ConfigError::ZeroTickBudget);
        }
        if self.ledger_capacity == 0 {
            return Err(ConfigError::LedgerCapacityZero);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`StageConfig::validate()`] or stage startup.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `batch_size` is zero.
    BatchSizeZero,
    /// `interval_ms` is NaN, infinite, zero, or negative.
    InvalidInterval {
        /// The invalid value.
        value: f64,
    },
    /// `seed_count` is zero.
    SeedCountZero,
    /// A visit weight is zero.
    InvalidWeights {
        /// Description of which weight was invalid.
        reason: String,
    },
    /// `max_ticks` is `Some(0)`.
    ZeroTickBudget,
    /// `ledger_capacity` is zero.
    LedgerCapacityZero,
    /// The stage worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchSizeZero => write!(f, "batch_size must be at least 1"),
            Self::InvalidInterval { value } => {
                write!(f, "interval_ms must be finite and positive, got {value}")
            }
            Self::SeedCountZero => write!(f, "seed_count must be at least 1"),
            Self::InvalidWeights { reason } => write!(f, "invalid visit weights: {reason}"),
            Self::ZeroTickBudget => write!(f, "max_ticks must be at least 1 when set"),
            Self::LedgerCapacityZero => write!(f, "ledger_capacity must be at least 1"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(StageConfig::default().validate(), Ok(()));
    }

    #[test]
    fn defaults_match_animation_cadence() {
        let c = StageConfig::default();
        assert_eq!(c.batch_size, 16);
        assert_eq!(c.defer_delay, Duration::from_millis(16));
        assert_eq!(c.interval_ms, 1000.0);
        assert_eq!(c.seed_count, 128);
        assert_eq!(c.weights, VisitWeights { access: 2, left_child: 1 });
    }

    #[test]
    fn rejects_zero_batch() {
        let c = StageConfig {
            batch_size: 0,
            ..StageConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::BatchSizeZero));
    }

    #[test]
    fn rejects_bad_interval() {
        for value in [0.0, -1.0, f64::INFINITY] {
            let c = StageConfig {
                interval_ms: value,
                ..StageConfig::default()
            };
            assert!(matches!(
                c.validate(),
                Err(ConfigError::InvalidInterval { .. })
            ));
        }
        let c = StageConfig {
            interval_ms: f64::NAN,
            ..StageConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn rejects_zero_weight() {
        let c = StageConfig {
            weights: VisitWeights {
                access: 2,
                left_child: 0,
            },
            ..StageConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn rejects_zero_budget_and_capacity() {
        let c = StageConfig {
            max_ticks: Some(0),
            ..StageConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::ZeroTickBudget));
        let c = StageConfig {
            ledger_capacity: 0,
            ..StageConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::LedgerCapacityZero));
        let c = StageConfig {
            seed_count: 0,
            ..StageConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::SeedCountZero));
    }
}

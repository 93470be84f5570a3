//! Error types for run ownership of an entry store.

use std::error::Error;
use std::fmt;

use crate::RunId;

/// Errors from acquiring, releasing, or driving a sort run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    /// Another run already holds the store. Concurrent triggers and
    /// reseeds are rejected rather than interleaved.
    RunInProgress {
        /// The run currently holding the store.
        active: RunId,
    },
    /// A release was attempted on a store with no active run.
    NotRunning,
    /// A release was attempted with a token for a different run.
    TokenMismatch {
        /// The run currently holding the store.
        expected: RunId,
        /// The run named by the presented token.
        found: RunId,
    },
    /// The run exceeded its configured tick budget without finishing.
    TickBudgetExceeded {
        /// The configured budget.
        budget: u64,
    },
    /// The stage driving runs has shut down.
    StageShutDown,
    /// A run was started with a configuration that fails validation.
    InvalidConfig {
        /// Description of the failed check.
        reason: String,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunInProgress { active } => write!(f, "run {active} already holds the store"),
            Self::NotRunning => write!(f, "no run holds the store"),
            Self::TokenMismatch { expected, found } => {
                write!(f, "token for run {found} presented, but run {expected} holds the store")
            }
            Self::TickBudgetExceeded { budget } => {
                write!(f, "run exceeded its budget of {budget} ticks")
            }
            Self::StageShutDown => write!(f, "stage has shut down"),
            Self::InvalidConfig { reason } => write!(f, "invalid run configuration: {reason}"),
        }
    }
}

impl Error for RunError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_active_run() {
        let active = RunId::next();
        let msg = RunError::RunInProgress { active }.to_string();
        assert!(msg.contains(&active.to_string()));
    }

    #[test]
    fn display_budget() {
        let msg = RunError::TickBudgetExceeded { budget: 42 }.to_string();
        assert_eq!(msg, "run exceeded its budget of 42 ticks");
    }

    #[test]
    fn display_invalid_config() {
        let err = RunError::InvalidConfig {
            reason: "batch_size must be at least 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid run configuration: batch_size must be at least 1"
        );
    }
}

//! Top-level unified error type for life-core.

use thiserror::Error;

use super::sub_errors::{ConfigError, FeatureError, GateError, MonitorError};

/// Top-level unified error type for life-core.
///
/// All crate errors are convertible to this type via `From` implementations.
///
/// # Recoverability
///
/// - Recoverable: the current cycle is degraded or skipped, the engine keeps
///   running ([`FeatureError`], [`GateError`]).
/// - Fatal: the engine halts new-cycle admission and requires operator
///   intervention ([`MonitorError`], [`ConfigError`], [`LifeError::Halted`]).
#[derive(Debug, Error)]
pub enum LifeError {
    /// Feature-extraction error. Recoverable: the cycle is skipped.
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    /// Gate pipeline error. Recoverable: the cycle is degraded.
    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    /// Autonomous monitor error. Fatal.
    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    /// Configuration error. Fatal at load time.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The subsystem is halted; new cycles are refused until the halt is
    /// cleared by an operator.
    #[error("Subsystem halted: {reason}")]
    Halted {
        /// Why the subsystem halted
        reason: String,
    },

    /// Internal error indicating a bug or invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LifeError {
    /// Whether the engine can continue running after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LifeError::Feature(_) | LifeError::Gate(_))
    }

    /// Whether this error halts new-cycle admission.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LifeError::Monitor(_)
                | LifeError::Config(_)
                | LifeError::Halted { .. }
                | LifeError::Internal(_)
        )
    }
}

/// Crate-wide result alias.
pub type LifeResult<T> = std::result::Result<T, LifeError>;

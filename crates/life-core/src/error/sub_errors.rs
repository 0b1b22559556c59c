//! Sub-error types for life-core.
//!
//! Each error type covers a specific domain of failures.

use thiserror::Error;

use crate::venturi::GateKind;

// ============================================================================
// FEATURE ERROR
// ============================================================================

/// Feature-extraction errors.
///
/// Both variants are recoverable-per-cycle: the orchestrator records the
/// cycle as skipped and retries with the next sample window. Skipped cycles
/// are excluded from the throughput counter.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Sample window too short (or empty) for spectral estimation.
    ///
    /// # When This Occurs
    ///
    /// - The EEG source delivered a truncated window
    /// - The no-signal placeholder was substituted for a missing sample
    /// - Zero channels, or a non-positive sampling rate
    #[error("Insufficient samples for spectral estimation: got {got}, need {needed}")]
    InsufficientSamples {
        /// Samples present in the window
        got: usize,
        /// Minimum samples required for one analysis segment
        needed: usize,
    },

    /// Channel data contains NaN or infinite amplitudes.
    #[error("Invalid channel data: non-finite amplitude in channel {channel} at index {index}")]
    InvalidChannelData {
        /// Offending channel
        channel: usize,
        /// Offending sample index within the channel
        index: usize,
    },
}

// ============================================================================
// GATE ERROR
// ============================================================================

/// Venturi gate pipeline errors.
///
/// `BudgetExceeded` is advisory: the cycle proceeds with its quality flagged
/// as degraded, and the autonomous monitor treats the breach as an anomaly
/// input. Budgets never hard-abort a cycle. `Clone` because recorded faults
/// travel inside cloneable pipeline and report values.
#[derive(Clone, Debug, Error)]
pub enum GateError {
    /// Observed latency exceeded the gate's budget for more than the
    /// configured number of consecutive cycles.
    #[error(
        "Gate {gate:?} exceeded latency budget: observed {observed_us}us, budget {budget_us}us \
         ({consecutive} consecutive breaches)"
    )]
    BudgetExceeded {
        /// Which gate breached
        gate: GateKind,
        /// Latency observed on the breaching call
        observed_us: u64,
        /// Configured budget
        budget_us: u64,
        /// Consecutive breach count at the time of signalling
        consecutive: u32,
    },
}

// ============================================================================
// MONITOR ERROR
// ============================================================================

/// Autonomous monitor errors.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Recalibration could not produce a valid parameter set.
    ///
    /// This is the one case where the subsystem must not self-heal: healing
    /// the healer has no safe fallback. The orchestrator halts new-cycle
    /// admission until an operator intervenes.
    #[error("Recalibration failed to produce valid parameters: {0}")]
    RecalibrationFailed(String),
}

// ============================================================================
// CONFIG ERROR
// ============================================================================

/// Configuration errors.
///
/// All are fatal at load time: the engine refuses to start with out-of-range
/// values rather than silently clamping them.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse failure.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A field value is outside its documented safe range.
    #[error("Config field `{field}` out of range: {value} (allowed: {allowed})")]
    OutOfRange {
        /// Dotted path of the offending field
        field: &'static str,
        /// The rejected value
        value: f64,
        /// Human-readable allowed range
        allowed: &'static str,
    },

    /// The per-gate latency budgets do not fit inside the cycle budget.
    #[error(
        "Gate latency budgets sum to {budgets_us}us, which does not fit the \
         {cycle_us}us cycle budget"
    )]
    BudgetOverflow {
        /// Sum of the three gate budgets
        budgets_us: u64,
        /// End-to-end cycle budget
        cycle_us: u64,
    },
}

//! Error types for life-core.
//!
//! This module defines the central error types used throughout the engine:
//!
//! - [`LifeError`]: Top-level unified error for all crate errors
//! - Sub-error types: [`FeatureError`], [`GateError`], [`MonitorError`],
//!   [`ConfigError`]
//!
//! # Error Taxonomy
//!
//! Errors fall into three tiers, which drive how the session orchestrator
//! reacts to them:
//!
//! - **Recoverable-per-cycle** ([`FeatureError`], [`GateError`]): captured in
//!   that cycle's `CycleReport`, logged, the cycle continues degraded or is
//!   skipped. Never propagated up the call stack.
//! - **Escalating**: sustained anomalies detected by the autonomous monitor;
//!   handled by automatic recalibration, not surfaced to callers.
//! - **Fatal** ([`MonitorError::RecalibrationFailed`], [`ConfigError`],
//!   [`LifeError::Halted`]): stop-the-world, the orchestrator refuses new
//!   cycles until an operator intervenes.
//!
//! # Examples
//!
//! ```rust
//! use life_core::error::{FeatureError, LifeError};
//!
//! let err = LifeError::from(FeatureError::InsufficientSamples {
//!     got: 4,
//!     needed: 64,
//! });
//! assert!(err.is_recoverable());
//! assert!(!err.is_fatal());
//! ```

mod sub_errors;
mod unified;

#[cfg(test)]
mod tests;

pub use sub_errors::{ConfigError, FeatureError, GateError, MonitorError};
pub use unified::{LifeError, LifeResult};

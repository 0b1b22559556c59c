//! Venturi Gate Pipeline - three-stage feature conditioning.
//!
//! # Architecture
//!
//! ```text
//! FeatureVector ──► Gate 1 ──► Gate 2 ──► Gate 3 ──► adaptive core
//!                Acceleration  Pressure-   Flow-
//!                (gain/norm)   Differential Recovery
//!                ~400us budget ~800us      ~2000us
//! ```
//!
//! Each gate owns a [`GateState`] with an advisory latency budget measured
//! on a monotonic clock. Sustained breaches surface as non-fatal
//! [`GateError::BudgetExceeded`](crate::error::GateError) faults that
//! degrade the cycle's quality score and feed the autonomous monitor's
//! anomaly detection.

mod gate;
mod pipeline;

pub use gate::{
    accelerate, flow_recovery, pressure_differential, GateConfig, GateKind, GateState,
    CONTRAST_GAIN, LATENCY_WINDOW,
};
pub use pipeline::{PipelinePass, VenturiConfig, VenturiPipeline, DEFAULT_BREACH_TOLERANCE};

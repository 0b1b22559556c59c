//! L.I.F.E Core Library
//!
//! Real-time neuroadaptive engine: EEG feature extraction, three-stage
//! Venturi gate conditioning, adaptive learning equations, and an
//! autonomous self-healing monitor, driven at a fixed cadence by a
//! single-task session runtime.
//!
//! # Architecture
//!
//! This crate defines:
//! - Domain types (`RawSample`, `FeatureVector`, `LearningState`, etc.)
//! - The processing stages (`FeatureExtractor`, `VenturiPipeline`,
//!   `AdaptiveCore`) and the `AutonomousMonitor` that watches them
//! - The `SessionOrchestrator` / `LifeRuntime` pair that runs a session
//! - Error types, result aliases, and TOML-backed configuration
//!
//! # Example
//!
//! ```
//! use life_core::config::LifeConfig;
//! use life_core::session::SessionOrchestrator;
//!
//! let config = LifeConfig::from_toml_str("").expect("defaults are valid");
//! let orchestrator = SessionOrchestrator::new(&config);
//! assert!(!orchestrator.is_halted());
//! assert_eq!(orchestrator.current_state().cycle, 0);
//! ```

pub mod adaptive;
pub mod config;
pub mod error;
pub mod feature;
pub mod monitor;
pub mod session;
pub mod types;
pub mod venturi;

// Re-exports for convenience
pub use config::LifeConfig;
pub use error::{LifeError, LifeResult};
pub use session::{LifeRuntime, SampleSource, SessionOrchestrator, SharedParameters};
pub use types::{CycleReport, CycleStatus, FeatureVector, LearningState, RawSample};

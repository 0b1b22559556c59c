//! Domain types for the L.I.F.E engine.
//!
//! # Module Structure
//!
//! - `sample` - Raw multi-channel EEG sample windows
//! - `features` - Per-cycle derived feature vectors
//! - `learning` - Learning state, stage and neural-state enums
//! - `health` - Health snapshots and per-cycle reports

mod features;
mod health;
mod learning;
mod sample;

pub use features::{BandPowers, FeatureVector};
pub use health::{CycleFault, CycleReport, CycleStatus, HealthSnapshot};
pub use learning::{LearningStage, LearningState, NeuralState};
pub use sample::RawSample;

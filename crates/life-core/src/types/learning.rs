//! Learning state and its classification enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adaptive::TraitProjection;

/// Stage of the learning process, derived each cycle by thresholding the
/// accumulated plasticity level against fixed boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningStage {
    /// Early skill uptake; little accumulated plasticity
    Acquisition,
    /// Stabilizing recently acquired traits
    Consolidation,
    /// Re-activating consolidated traits
    Retrieval,
    /// Near-saturation refinement
    Adaptation,
}

/// Momentary neural state, derived each cycle from the feature scalars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeuralState {
    /// Low engagement, idle cortex
    Resting,
    /// Sustained attention without high stress
    Focused,
    /// Active trait growth above the learning threshold
    Learning,
    /// High-load processing under stress
    Processing,
    /// Post-activity integration
    Consolidating,
}

/// Per-cycle output of the adaptive learning core.
///
/// Created once per cycle, immutable after creation, superseded (never
/// mutated) by the next cycle's state. The orchestrator retains recent
/// states in a bounded ring buffer for the monitor's baseline computation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LearningState {
    /// Cycle index this state was produced on
    pub cycle: u64,
    /// Trait modulation delta (dT) for this cycle
    pub trait_delta: f32,
    /// Neuroplasticity growth applied this cycle
    pub growth: f32,
    /// Accumulated plasticity level in [0, saturation]
    pub plasticity_level: f32,
    /// Projected trait vector (normalized weighted superposition)
    pub projection: TraitProjection,
    /// Derived learning stage
    pub stage: LearningStage,
    /// Derived neural state
    pub neural_state: NeuralState,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl LearningState {
    /// The state before any cycle has run: zero level, resting, acquiring.
    pub fn initial() -> Self {
        Self {
            cycle: 0,
            trait_delta: 0.0,
            growth: 0.0,
            plasticity_level: 0.0,
            projection: TraitProjection::uniform(),
            stage: LearningStage::Acquisition,
            neural_state: NeuralState::Resting,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_resting_acquisition() {
        let state = LearningState::initial();
        assert_eq!(state.cycle, 0);
        assert_eq!(state.stage, LearningStage::Acquisition);
        assert_eq!(state.neural_state, NeuralState::Resting);
        assert_eq!(state.plasticity_level, 0.0);
    }

    #[test]
    fn initial_projection_is_normalized() {
        let state = LearningState::initial();
        assert!((state.projection.norm_sq() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn learning_state_serializes() {
        let state = LearningState::initial();
        let json = serde_json::to_string(&state).expect("serialize");
        let back: LearningState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.stage, state.stage);
        assert_eq!(back.neural_state, state.neural_state);
        assert_eq!(back.cycle, state.cycle);
    }
}

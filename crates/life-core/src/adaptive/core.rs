//! The adaptive learning equations.
//!
//! Three coupled computations run in fixed order every cycle:
//!
//! 1. Trait modulation:
//!    `dT = adaptation_rate * engagement * (1 + env_weight * env_factor)`
//! 2. Neuroplasticity growth:
//!    `growth = base_rate * (1 - level/saturation) * experience * ln(1 + elapsed)`
//! 3. Trait projection: normalized weighted superposition over the fixed
//!    trait basis (see [`TraitProjection`]).
//!
//! followed by stage/state classification against fixed thresholds.
//!
//! [`advance`](AdaptiveCore::advance) never errors and has no side effects:
//! every derived field is a pure function of `(features, params, prior,
//! env_factor)` — essential for reproducibility and for unit-testing the
//! equations independently of the pipeline. The state's timestamp is
//! publication metadata, not part of the computation. Out-of-bounds
//! parameters are rejected at the update site, never clamped here.

use chrono::Utc;

use crate::adaptive::params::LearningParameters;
use crate::adaptive::projection::TraitProjection;
use crate::types::{FeatureVector, LearningStage, LearningState, NeuralState};

/// Neutral environment factor, used when no context is supplied.
///
/// Deliberately 1.0 rather than 0.0: a silent zero would null the
/// environment term entirely and mask a missing context source.
pub const NEUTRAL_ENV_FACTOR: f32 = 1.0;

/// Cycle count at which the experience scalar reaches 0.5.
pub const EXPERIENCE_HALF_LIFE: f32 = 20.0;

/// Upper bound on a single cycle's growth step.
pub const MAX_GROWTH_STEP: f32 = 0.5;

/// Stage boundaries over level/saturation: below the first value is
/// Acquisition, then Consolidation, then Retrieval, then Adaptation.
pub const STAGE_BOUNDS: [f32; 3] = [0.25, 0.55, 0.80];

/// Engagement below this classifies as Resting.
pub const RESTING_ENGAGEMENT: f32 = 0.2;
/// Stress at or above this classifies as Processing.
pub const PROCESSING_STRESS: f32 = 0.6;
/// Growth at or above this classifies as Learning.
pub const LEARNING_GROWTH: f32 = 0.01;
/// Focus at or above this classifies as Focused.
pub const FOCUSED_FOCUS: f32 = 0.6;

/// The adaptive learning core. Stateless: all cycle state lives in the
/// [`LearningState`] it consumes and produces.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdaptiveCore;

impl AdaptiveCore {
    /// Advance one cycle: produce the next learning state from the
    /// conditioned features, the active parameter snapshot and the prior
    /// state.
    ///
    /// `env_factor` is the external/contextual input; pass
    /// [`NEUTRAL_ENV_FACTOR`] when no context source is attached.
    pub fn advance(
        &self,
        features: &FeatureVector,
        params: &LearningParameters,
        prior: &LearningState,
        env_factor: f32,
    ) -> LearningState {
        let cycle = prior.cycle + 1;

        // 1. Trait modulation
        let trait_delta = params.adaptation_rate
            * features.engagement
            * (1.0 + params.environment_weight * env_factor);

        // 2. Neuroplasticity growth. `elapsed` is the prior cycle count, so
        // ln(1 + elapsed) is always well-defined and non-negative.
        let level = prior
            .plasticity_level
            .clamp(0.0, params.saturation_level);
        let headroom = 1.0 - level / params.saturation_level;
        let experience = cycle as f32 / (cycle as f32 + EXPERIENCE_HALF_LIFE);
        let elapsed = prior.cycle as f32;
        let growth = (params.base_growth_rate * headroom * experience * (1.0 + elapsed).ln())
            .clamp(0.0, MAX_GROWTH_STEP);
        let plasticity_level = (level + growth).min(params.saturation_level);

        // 3. Trait projection
        let level_ratio = plasticity_level / params.saturation_level;
        let projection =
            TraitProjection::project(level_ratio, trait_delta, params.quantum_coherence);

        // 4. Classification
        let stage = classify_stage(level_ratio);
        let neural_state = classify_neural_state(features, growth);

        LearningState {
            cycle,
            trait_delta,
            growth,
            plasticity_level,
            projection,
            stage,
            neural_state,
            timestamp: Utc::now(),
        }
    }
}

/// Threshold the level/saturation ratio into a learning stage.
fn classify_stage(level_ratio: f32) -> LearningStage {
    if level_ratio < STAGE_BOUNDS[0] {
        LearningStage::Acquisition
    } else if level_ratio < STAGE_BOUNDS[1] {
        LearningStage::Consolidation
    } else if level_ratio < STAGE_BOUNDS[2] {
        LearningStage::Retrieval
    } else {
        LearningStage::Adaptation
    }
}

/// Classify the momentary neural state from the feature scalars and this
/// cycle's growth. Precedence: Resting, then Processing, then Learning,
/// then Focused, then Consolidating.
fn classify_neural_state(features: &FeatureVector, growth: f32) -> NeuralState {
    if features.engagement < RESTING_ENGAGEMENT {
        NeuralState::Resting
    } else if features.stress >= PROCESSING_STRESS {
        NeuralState::Processing
    } else if growth >= LEARNING_GROWTH {
        NeuralState::Learning
    } else if features.focus >= FOCUSED_FOCUS {
        NeuralState::Focused
    } else {
        NeuralState::Consolidating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BandPowers;

    fn features(engagement: f32, focus: f32, stress: f32) -> FeatureVector {
        FeatureVector {
            bands: BandPowers {
                delta: 1.0,
                theta: 2.0,
                alpha: 10.0,
                beta: 5.0,
                gamma: 0.5,
            },
            coherence: 0.9,
            engagement,
            focus,
            stress,
        }
    }

    #[test]
    fn advance_is_deterministic() {
        let core = AdaptiveCore;
        let params = LearningParameters::safe_defaults();
        let prior = LearningState::initial();
        let fv = features(0.5, 0.4, 0.2);

        let a = core.advance(&fv, &params, &prior, NEUTRAL_ENV_FACTOR);
        let b = core.advance(&fv, &params, &prior, NEUTRAL_ENV_FACTOR);
        assert_eq!(a.trait_delta, b.trait_delta);
        assert_eq!(a.growth, b.growth);
        assert_eq!(a.plasticity_level, b.plasticity_level);
        assert_eq!(a.projection, b.projection);
        assert_eq!(a.stage, b.stage);
        assert_eq!(a.neural_state, b.neural_state);
    }

    #[test]
    fn trait_delta_matches_equation() {
        let core = AdaptiveCore;
        let params = LearningParameters {
            adaptation_rate: 0.2,
            environment_weight: 0.5,
            ..Default::default()
        };
        let state = core.advance(
            &features(0.6, 0.4, 0.2),
            &params,
            &LearningState::initial(),
            2.0,
        );
        // dT = 0.2 * 0.6 * (1 + 0.5 * 2.0) = 0.24
        assert!((state.trait_delta - 0.24).abs() < 1e-6);
    }

    #[test]
    fn first_cycle_has_zero_growth() {
        // elapsed = prior.cycle = 0 => ln(1) = 0
        let core = AdaptiveCore;
        let state = core.advance(
            &features(0.5, 0.4, 0.2),
            &LearningParameters::safe_defaults(),
            &LearningState::initial(),
            NEUTRAL_ENV_FACTOR,
        );
        assert_eq!(state.growth, 0.0);
        assert_eq!(state.plasticity_level, 0.0);
    }

    #[test]
    fn growth_is_positive_after_first_cycle() {
        let core = AdaptiveCore;
        let params = LearningParameters::safe_defaults();
        let mut state = LearningState::initial();
        for _ in 0..3 {
            state = core.advance(&features(0.5, 0.4, 0.2), &params, &state, NEUTRAL_ENV_FACTOR);
        }
        assert!(state.growth > 0.0);
        assert!(state.plasticity_level > 0.0);
    }

    #[test]
    fn growth_vanishes_at_saturation() {
        let core = AdaptiveCore;
        let params = LearningParameters::safe_defaults();
        let mut prior = LearningState::initial();
        prior.cycle = 100;
        prior.plasticity_level = params.saturation_level;
        let state = core.advance(&features(0.9, 0.8, 0.2), &params, &prior, NEUTRAL_ENV_FACTOR);
        assert_eq!(state.growth, 0.0);
        assert_eq!(state.plasticity_level, params.saturation_level);
    }

    #[test]
    fn growth_never_negative_and_never_exceeds_max_step() {
        let core = AdaptiveCore;
        let params = LearningParameters {
            base_growth_rate: 1.0,
            ..Default::default()
        };
        let mut state = LearningState::initial();
        for _ in 0..500 {
            state = core.advance(&features(0.9, 0.8, 0.2), &params, &state, NEUTRAL_ENV_FACTOR);
            assert!(state.growth >= 0.0);
            assert!(state.growth <= MAX_GROWTH_STEP);
            assert!(state.plasticity_level <= params.saturation_level);
        }
    }

    #[test]
    fn plasticity_level_is_monotone_non_decreasing() {
        let core = AdaptiveCore;
        let params = LearningParameters::safe_defaults();
        let mut state = LearningState::initial();
        let mut last_level = 0.0f32;
        for _ in 0..200 {
            state = core.advance(&features(0.6, 0.5, 0.3), &params, &state, NEUTRAL_ENV_FACTOR);
            assert!(state.plasticity_level >= last_level);
            last_level = state.plasticity_level;
        }
    }

    #[test]
    fn stage_progression_follows_level_ratio() {
        assert_eq!(classify_stage(0.0), LearningStage::Acquisition);
        assert_eq!(classify_stage(0.24), LearningStage::Acquisition);
        assert_eq!(classify_stage(0.25), LearningStage::Consolidation);
        assert_eq!(classify_stage(0.54), LearningStage::Consolidation);
        assert_eq!(classify_stage(0.55), LearningStage::Retrieval);
        assert_eq!(classify_stage(0.80), LearningStage::Adaptation);
        assert_eq!(classify_stage(1.0), LearningStage::Adaptation);
    }

    #[test]
    fn neural_state_precedence() {
        // Resting wins on low engagement regardless of stress
        assert_eq!(
            classify_neural_state(&features(0.1, 0.9, 0.9), 0.1),
            NeuralState::Resting
        );
        // Processing on high stress
        assert_eq!(
            classify_neural_state(&features(0.5, 0.9, 0.7), 0.1),
            NeuralState::Processing
        );
        // Learning on growth
        assert_eq!(
            classify_neural_state(&features(0.5, 0.9, 0.2), 0.05),
            NeuralState::Learning
        );
        // Focused on focus without growth
        assert_eq!(
            classify_neural_state(&features(0.5, 0.9, 0.2), 0.0),
            NeuralState::Focused
        );
        // Consolidating otherwise
        assert_eq!(
            classify_neural_state(&features(0.5, 0.3, 0.2), 0.0),
            NeuralState::Consolidating
        );
    }

    #[test]
    fn advance_stays_well_formed_across_valid_param_grid() {
        // Sweep a grid of valid parameter sets; derived enums must always
        // classify (no panic, projection always normalized)
        let core = AdaptiveCore;
        for rate in [0.0f32, 0.3, 1.0] {
            for weight in [0.0f32, 0.5, 1.0] {
                for growth_rate in [0.01f32, 0.5, 1.0] {
                    for saturation in [0.5f32, 10.0, 100.0] {
                        let params = LearningParameters {
                            adaptation_rate: rate,
                            environment_weight: weight,
                            base_growth_rate: growth_rate,
                            saturation_level: saturation,
                            quantum_coherence: 0.85,
                        };
                        params.validate().expect("grid point must be valid");
                        let mut state = LearningState::initial();
                        for _ in 0..10 {
                            state = core.advance(
                                &features(0.6, 0.5, 0.3),
                                &params,
                                &state,
                                NEUTRAL_ENV_FACTOR,
                            );
                            assert!(state.projection.is_normalized());
                            assert!(state.plasticity_level.is_finite());
                        }
                    }
                }
            }
        }
    }
}

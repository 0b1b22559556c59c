//! Tunable learning parameters and their documented safe bounds.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Safe-default adaptation rate.
pub const DEFAULT_ADAPTATION_RATE: f32 = 0.1;
/// Safe-default environment weight.
pub const DEFAULT_ENVIRONMENT_WEIGHT: f32 = 0.3;
/// Safe-default base growth rate.
pub const DEFAULT_BASE_GROWTH_RATE: f32 = 0.05;
/// Safe-default saturation level.
pub const DEFAULT_SATURATION_LEVEL: f32 = 10.0;
/// Safe-default quantum coherence factor.
pub const DEFAULT_QUANTUM_COHERENCE: f32 = 0.85;

/// Tunable scalars shared by the adaptive learning core.
///
/// Exactly one parameter set is active at any instant. Besides
/// initialization, only the autonomous monitor may rewrite these at
/// runtime, and always atomically as a complete set (the orchestrator swaps
/// an `Arc` snapshot; no partial update is ever visible mid-cycle).
///
/// Out-of-range values are rejected at the update site via [`validate`] —
/// never silently clamped — so the core's `advance` stays pure.
///
/// [`validate`]: LearningParameters::validate
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningParameters {
    /// Trait modulation rate, in [0, 1]
    pub adaptation_rate: f32,
    /// Contextual weighting of the environment factor, in [0, 1]
    pub environment_weight: f32,
    /// Base neuroplasticity growth rate, in (0, 1]
    pub base_growth_rate: f32,
    /// Plasticity saturation ceiling, > 0
    pub saturation_level: f32,
    /// Projection magnitude scaling, in [0, 1]
    pub quantum_coherence: f32,
}

impl Default for LearningParameters {
    fn default() -> Self {
        Self::safe_defaults()
    }
}

impl LearningParameters {
    /// The documented safe defaults; also the recalibration target.
    pub fn safe_defaults() -> Self {
        Self {
            adaptation_rate: DEFAULT_ADAPTATION_RATE,
            environment_weight: DEFAULT_ENVIRONMENT_WEIGHT,
            base_growth_rate: DEFAULT_BASE_GROWTH_RATE,
            saturation_level: DEFAULT_SATURATION_LEVEL,
            quantum_coherence: DEFAULT_QUANTUM_COHERENCE,
        }
    }

    /// Check every field against its documented range.
    ///
    /// Returns the first violation; callers reject the whole set (updates
    /// are all-or-nothing).
    pub fn validate(&self) -> Result<(), ConfigError> {
        range_check(
            "parameters.adaptation_rate",
            self.adaptation_rate,
            0.0..=1.0,
            "[0, 1]",
        )?;
        range_check(
            "parameters.environment_weight",
            self.environment_weight,
            0.0..=1.0,
            "[0, 1]",
        )?;
        if !self.base_growth_rate.is_finite()
            || self.base_growth_rate <= 0.0
            || self.base_growth_rate > 1.0
        {
            return Err(ConfigError::OutOfRange {
                field: "parameters.base_growth_rate",
                value: self.base_growth_rate as f64,
                allowed: "(0, 1]",
            });
        }
        if !self.saturation_level.is_finite() || self.saturation_level <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "parameters.saturation_level",
                value: self.saturation_level as f64,
                allowed: "(0, inf)",
            });
        }
        range_check(
            "parameters.quantum_coherence",
            self.quantum_coherence,
            0.0..=1.0,
            "[0, 1]",
        )?;
        Ok(())
    }
}

fn range_check(
    field: &'static str,
    value: f32,
    range: std::ops::RangeInclusive<f32>,
    allowed: &'static str,
) -> Result<(), ConfigError> {
    if !value.is_finite() || !range.contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            allowed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_defaults_validate() {
        LearningParameters::safe_defaults()
            .validate()
            .expect("safe defaults must be valid");
    }

    #[test]
    fn rejects_adaptation_rate_above_one() {
        let params = LearningParameters {
            adaptation_rate: 1.5,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("adaptation_rate"));
    }

    #[test]
    fn rejects_zero_growth_rate() {
        let params = LearningParameters {
            base_growth_rate: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_nan_anywhere() {
        for field in 0..5 {
            let mut params = LearningParameters::safe_defaults();
            match field {
                0 => params.adaptation_rate = f32::NAN,
                1 => params.environment_weight = f32::NAN,
                2 => params.base_growth_rate = f32::NAN,
                3 => params.saturation_level = f32::NAN,
                _ => params.quantum_coherence = f32::NAN,
            }
            assert!(params.validate().is_err(), "field {field} accepted NaN");
        }
    }

    #[test]
    fn rejects_negative_saturation() {
        let params = LearningParameters {
            saturation_level: -1.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let params = LearningParameters::safe_defaults();
        let text = toml::to_string(&params).expect("serialize");
        let back: LearningParameters = toml::from_str(&text).expect("deserialize");
        assert_eq!(back, params);
    }
}

//! Per-cycle derived feature vectors.

use serde::{Deserialize, Serialize};

/// Spectral power in the five canonical EEG bands.
///
/// Band boundaries are fixed contract points (delta 0.5-4 Hz, theta 4-8,
/// alpha 8-13, beta 13-30, gamma 30-45); all powers are non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BandPowers {
    pub delta: f32,
    pub theta: f32,
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

impl BandPowers {
    /// Total power across all five bands.
    pub fn total(&self) -> f32 {
        self.delta + self.theta + self.alpha + self.beta + self.gamma
    }

    /// Whether every band power is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.delta, self.theta, self.alpha, self.beta, self.gamma]
            .iter()
            .all(|p| p.is_finite() && *p >= 0.0)
    }
}

/// Feature vector derived from one sample window.
///
/// Owned exclusively by the pipeline for the duration of one cycle and
/// discarded after the cycle completes; only summary metrics outlive it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Band powers, averaged across channels
    pub bands: BandPowers,
    /// Inter-channel coherence score in [0, 1]
    pub coherence: f32,
    /// Engagement estimate in [0, 1], derived from beta/(alpha+theta)
    pub engagement: f32,
    /// Focus estimate in [0, 1], derived from beta/alpha
    pub focus: f32,
    /// Stress estimate in [0, 1], derived from (beta+gamma)/(alpha+theta)
    pub stress: f32,
}

impl FeatureVector {
    /// The zero vector, used as the gate-2 differential baseline on the
    /// first cycle after startup.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Flatten into the fixed component order used by the gate transforms:
    /// five band powers, then coherence, engagement, focus, stress.
    pub fn components(&self) -> [f32; 9] {
        [
            self.bands.delta,
            self.bands.theta,
            self.bands.alpha,
            self.bands.beta,
            self.bands.gamma,
            self.coherence,
            self.engagement,
            self.focus,
            self.stress,
        ]
    }

    /// Rebuild from the component order produced by [`components`].
    ///
    /// [`components`]: FeatureVector::components
    pub fn from_components(c: [f32; 9]) -> Self {
        Self {
            bands: BandPowers {
                delta: c[0],
                theta: c[1],
                alpha: c[2],
                beta: c[3],
                gamma: c[4],
            },
            coherence: c[5],
            engagement: c[6],
            focus: c[7],
            stress: c[8],
        }
    }
}

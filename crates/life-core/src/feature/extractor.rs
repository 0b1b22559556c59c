//! Feature extraction from raw sample windows.
//!
//! Converts a multi-channel EEG window into one [`FeatureVector`]: Welch
//! band powers averaged across channels, an inter-channel coherence score,
//! and the derived engagement/focus/stress scalars.
//!
//! The extractor is stateless across calls except for the cached Hann
//! window coefficients, which are built once at construction and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;
use crate::feature::spectral::{bin_band_powers, hann_window, pearson, welch_psd};
use crate::types::{BandPowers, FeatureVector, RawSample};

/// Default Welch segment length (power of two). At 250 Hz this gives
/// ~0.98 Hz frequency resolution, enough to separate the delta band.
pub const DEFAULT_SEGMENT_LEN: usize = 256;

/// Guard added to ratio denominators so silent bands cannot divide by zero.
const RATIO_EPS: f32 = 1e-9;

/// Configuration for the feature extractor.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Welch segment length in samples; must be a power of two >= 64
    pub segment_len: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            segment_len: DEFAULT_SEGMENT_LEN,
        }
    }
}

/// Stateless feature extractor with cached window coefficients.
#[derive(Clone, Debug)]
pub struct FeatureExtractor {
    segment_len: usize,
    // Built once at construction; read-only afterwards
    window: Vec<f32>,
}

impl FeatureExtractor {
    /// Build an extractor for the given configuration.
    ///
    /// The segment length is assumed already validated by config loading
    /// (power of two, >= 64); `debug_assert` guards the invariant.
    pub fn new(config: &FeatureConfig) -> Self {
        debug_assert!(config.segment_len.is_power_of_two());
        debug_assert!(config.segment_len >= 64);
        Self {
            segment_len: config.segment_len,
            window: hann_window(config.segment_len),
        }
    }

    /// Minimum samples per channel required for one analysis segment.
    pub fn min_samples(&self) -> usize {
        self.segment_len
    }

    /// Extract a feature vector from one raw sample window.
    ///
    /// # Errors
    ///
    /// - [`FeatureError::InsufficientSamples`]: empty window, too few
    ///   samples for one segment, or non-positive sampling rate
    /// - [`FeatureError::InvalidChannelData`]: any NaN/Inf amplitude
    pub fn extract(&self, raw: &RawSample) -> Result<FeatureVector, FeatureError> {
        let samples = raw.samples_per_channel();
        if raw.channel_count() == 0 || samples < self.segment_len || raw.sample_rate_hz <= 0.0 {
            return Err(FeatureError::InsufficientSamples {
                got: samples,
                needed: self.segment_len,
            });
        }

        for (channel, series) in raw.channels.iter().enumerate() {
            if series.len() != samples {
                // Ragged windows cannot be segmented consistently
                return Err(FeatureError::InsufficientSamples {
                    got: series.len(),
                    needed: samples,
                });
            }
            if let Some(index) = series.iter().position(|v| !v.is_finite()) {
                return Err(FeatureError::InvalidChannelData { channel, index });
            }
        }

        let bands = self.mean_band_powers(raw);
        let coherence = self.coherence(raw);
        let (engagement, focus, stress) = derive_scalars(&bands);

        Ok(FeatureVector {
            bands,
            coherence,
            engagement,
            focus,
            stress,
        })
    }

    /// Welch band powers per channel, averaged across channels.
    fn mean_band_powers(&self, raw: &RawSample) -> BandPowers {
        let n = raw.channels.len() as f32;
        let mut acc = BandPowers::default();
        for series in &raw.channels {
            let psd = welch_psd(series, &self.window, raw.sample_rate_hz);
            let bands = bin_band_powers(&psd, self.segment_len, raw.sample_rate_hz);
            acc.delta += bands.delta;
            acc.theta += bands.theta;
            acc.alpha += bands.alpha;
            acc.beta += bands.beta;
            acc.gamma += bands.gamma;
        }
        BandPowers {
            delta: acc.delta / n,
            theta: acc.theta / n,
            alpha: acc.alpha / n,
            beta: acc.beta / n,
            gamma: acc.gamma / n,
        }
    }

    /// Mean absolute pairwise Pearson correlation across channels.
    ///
    /// Polarity is ignored: anti-phase channels are still synchronized.
    /// Single-channel windows score 1.0 (a channel is trivially coherent
    /// with itself).
    fn coherence(&self, raw: &RawSample) -> f32 {
        let n = raw.channels.len();
        if n < 2 {
            return 1.0;
        }
        let mut sum = 0.0f32;
        let mut pairs = 0u32;
        for i in 0..n {
            for j in (i + 1)..n {
                sum += pearson(&raw.channels[i], &raw.channels[j]).abs();
                pairs += 1;
            }
        }
        (sum / pairs as f32).clamp(0.0, 1.0)
    }
}

/// Engagement/focus/stress from weighted band-power ratios.
///
/// Each ratio is squashed onto [0, 1) with x/(1+x) so downstream consumers
/// never see an unbounded scalar:
///
/// - engagement = beta / (alpha + theta)
/// - focus      = beta / alpha
/// - stress     = (beta + gamma) / (alpha + theta)
fn derive_scalars(bands: &BandPowers) -> (f32, f32, f32) {
    let engagement = squash(bands.beta / (bands.alpha + bands.theta + RATIO_EPS));
    let focus = squash(bands.beta / (bands.alpha + RATIO_EPS));
    let stress = squash((bands.beta + bands.gamma) / (bands.alpha + bands.theta + RATIO_EPS));
    (engagement, focus, stress)
}

/// Map a non-negative ratio onto [0, 1).
fn squash(x: f32) -> f32 {
    x / (1.0 + x)
}

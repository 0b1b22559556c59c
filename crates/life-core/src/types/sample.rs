//! Raw multi-channel EEG sample windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// One raw multi-channel time-series window.
///
/// Produced by the external EEG acquisition layer, consumed exactly once by
/// the feature extractor. Immutable by convention: no mutators are exposed.
/// The extractor, not the constructor, validates the window — the producer
/// is outside this subsystem's control and a bad window must surface as a
/// recoverable per-cycle error, not a panic.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSample {
    /// Per-channel amplitude series, all channels the same length
    pub channels: Vec<Vec<f32>>,
    /// Sampling rate in Hz
    pub sample_rate_hz: f32,
    /// Acquisition timestamp of the window start
    pub timestamp: DateTime<Utc>,
}

impl RawSample {
    /// Create a sample window from channel data.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate_hz: f32) -> Self {
        Self {
            channels,
            sample_rate_hz,
            timestamp: Utc::now(),
        }
    }

    /// The documented no-signal placeholder.
    ///
    /// Substituted by the orchestrator when the sample source delivers
    /// nothing within the cycle timeout. The feature extractor rejects it
    /// with `FeatureError::InsufficientSamples`, which keeps the cycle
    /// cadence steady while marking the cycle as skipped.
    pub fn no_signal() -> Self {
        Self {
            channels: Vec::new(),
            sample_rate_hz: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Number of channels in the window.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel (0 for an empty window).
    pub fn samples_per_channel(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Synthesize a window of pure sinusoids, one tone per channel.
    ///
    /// `tones` gives (frequency_hz, amplitude) per channel. Used by tests and
    /// by bench/demo harnesses to produce windows with known band content.
    pub fn synthetic(tones: &[(f32, f32)], sample_rate_hz: f32, samples: usize) -> Self {
        let channels = tones
            .iter()
            .map(|&(freq, amp)| {
                (0..samples)
                    .map(|i| amp * (TAU * freq * i as f32 / sample_rate_hz).sin())
                    .collect()
            })
            .collect();
        Self::new(channels, sample_rate_hz)
    }
}

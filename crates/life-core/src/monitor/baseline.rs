//! Baseline statistics for anomaly deviation checks.

use serde::{Deserialize, Serialize};

use crate::types::HealthSnapshot;

/// Quality/latency/throughput means established over an observation window,
/// used as the reference for percentage-deviation anomaly checks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Mean quality score
    pub quality: f32,
    /// Mean end-to-end latency, microseconds
    pub avg_latency_us: f64,
    /// Mean throughput, Hz
    pub throughput_hz: f32,
}

impl Baseline {
    /// Mean the metrics of an observation window.
    ///
    /// Callers guarantee a non-empty window (the monitor only establishes
    /// after `baseline_window` snapshots).
    pub fn from_snapshots(window: &[HealthSnapshot]) -> Self {
        debug_assert!(!window.is_empty());
        let n = window.len() as f64;
        let quality = window.iter().map(|s| s.quality as f64).sum::<f64>() / n;
        let latency = window.iter().map(|s| s.avg_latency_us as f64).sum::<f64>() / n;
        let throughput = window.iter().map(|s| s.throughput_hz as f64).sum::<f64>() / n;
        Self {
            quality: quality as f32,
            avg_latency_us: latency,
            throughput_hz: throughput as f32,
        }
    }

    /// Whether a snapshot deviates beyond `pct` from this baseline in any
    /// axis: quality or throughput dropping, or latency rising.
    pub fn deviates(&self, snapshot: &HealthSnapshot, pct: f32) -> bool {
        let quality_floor = self.quality * (1.0 - pct);
        if snapshot.quality < quality_floor {
            return true;
        }
        let latency_ceiling = self.avg_latency_us * (1.0 + pct as f64);
        if self.avg_latency_us > 0.0 && (snapshot.avg_latency_us as f64) > latency_ceiling {
            return true;
        }
        let throughput_floor = self.throughput_hz * (1.0 - pct);
        if self.throughput_hz > 0.0 && snapshot.throughput_hz < throughput_floor {
            return true;
        }
        false
    }
}

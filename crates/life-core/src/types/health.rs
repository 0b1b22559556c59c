//! Health snapshots and per-cycle reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{LearningStage, NeuralState};
use crate::venturi::GateKind;

/// Quality/latency/throughput summary produced every monitoring tick and
/// after every cycle, appended to a bounded history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Aggregate quality score in [0, 1]
    pub quality: f32,
    /// Average end-to-end cycle latency in microseconds
    pub avg_latency_us: u64,
    /// Completed-cycle throughput in Hz
    pub throughput_hz: f32,
    /// Whether this snapshot deviates beyond the configured threshold
    /// from the established baseline
    pub anomalous: bool,
    /// Consecutive anomalous snapshots up to and including this one
    pub consecutive_anomalies: u32,
    /// Snapshot timestamp
    pub timestamp: DateTime<Utc>,
}

impl HealthSnapshot {
    /// A nominal snapshot with the given metrics.
    pub fn nominal(quality: f32, avg_latency_us: u64, throughput_hz: f32) -> Self {
        Self {
            quality,
            avg_latency_us,
            throughput_hz,
            anomalous: false,
            consecutive_anomalies: 0,
            timestamp: Utc::now(),
        }
    }
}

/// How a cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleStatus {
    /// Full pipeline ran within budgets
    Completed,
    /// Pipeline ran but at least one recoverable fault was recorded
    Degraded,
    /// Feature extraction rejected the window; prior state republished,
    /// cycle excluded from throughput
    Skipped,
}

/// A recoverable fault captured in a cycle report.
///
/// Faults are recorded here rather than propagated up the call stack so a
/// single consumer can render a continuous timeline including degraded
/// periods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CycleFault {
    /// Sample window rejected before spectral estimation
    InsufficientSamples,
    /// Non-finite amplitude in the sample window
    InvalidChannelData {
        /// Offending channel
        channel: usize,
    },
    /// A gate breached its latency budget
    GateBudgetExceeded {
        /// Which gate breached
        gate: GateKind,
        /// Observed latency on the breaching call
        observed_us: u64,
    },
    /// No sample arrived within the cycle timeout
    NoSignal,
}

/// Per-cycle outcome record published to external consumers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleReport {
    /// Cycle index
    pub cycle: u64,
    /// How the cycle ended
    pub status: CycleStatus,
    /// Recoverable faults recorded during the cycle
    pub faults: Vec<CycleFault>,
    /// Observed latency per gate, pipeline order, microseconds
    pub gate_latencies_us: [u64; 3],
    /// End-to-end cycle latency in microseconds
    pub total_latency_us: u64,
    /// Quality score assigned to this cycle in [0, 1]
    pub quality: f32,
    /// Stage of the published learning state
    pub stage: LearningStage,
    /// Neural state of the published learning state
    pub neural_state: NeuralState,
    /// Report timestamp
    pub timestamp: DateTime<Utc>,
}

impl CycleReport {
    /// Whether the cycle counted toward throughput.
    pub fn counts_toward_throughput(&self) -> bool {
        self.status != CycleStatus::Skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_snapshot_has_no_anomaly() {
        let snap = HealthSnapshot::nominal(0.9, 1200, 1.0);
        assert!(!snap.anomalous);
        assert_eq!(snap.consecutive_anomalies, 0);
    }

    #[test]
    fn skipped_cycles_do_not_count_toward_throughput() {
        let report = CycleReport {
            cycle: 5,
            status: CycleStatus::Skipped,
            faults: vec![CycleFault::InvalidChannelData { channel: 0 }],
            gate_latencies_us: [0, 0, 0],
            total_latency_us: 80,
            quality: 0.0,
            stage: LearningStage::Acquisition,
            neural_state: NeuralState::Resting,
            timestamp: Utc::now(),
        };
        assert!(!report.counts_toward_throughput());
    }

    #[test]
    fn cycle_report_serializes() {
        let report = CycleReport {
            cycle: 1,
            status: CycleStatus::Degraded,
            faults: vec![CycleFault::GateBudgetExceeded {
                gate: GateKind::Acceleration,
                observed_us: 900,
            }],
            gate_latencies_us: [900, 120, 300],
            total_latency_us: 2100,
            quality: 0.74,
            stage: LearningStage::Consolidation,
            neural_state: NeuralState::Focused,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&report).expect("serialize");
        let back: CycleReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.status, CycleStatus::Degraded);
        assert_eq!(back.faults, report.faults);
    }
}

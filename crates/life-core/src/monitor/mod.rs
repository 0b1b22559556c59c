//! Autonomous Monitor - anomaly detection and self-healing.
//!
//! # State machine
//!
//! ```text
//! Establishing ──► Nominal ──► Degraded ──► Emergency ──► Recalibrating ─┐
//!      ▲             ▲            │                                      │
//!      │             └────────────┘ (anomaly clears)                     │
//!      └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The monitor samples the newest [`HealthSnapshot`] every monitoring tick,
//! establishes a quality/latency/throughput baseline over an initial
//! observation window, and flags snapshots deviating beyond a configured
//! percentage from that baseline. One anomalous snapshot degrades; a
//! configured streak escalates to Emergency, which issues exactly one
//! recalibration action and re-establishes the baseline from scratch.
//!
//! Escalation-by-streak rather than single-sample reaction keeps the
//! monitor from over-reacting to transient noise. Ticks are the monitor's
//! only notion of time, so the escalation logic is testable without
//! wall-clock waits.

mod baseline;

#[cfg(test)]
mod tests;

pub use baseline::Baseline;

use serde::{Deserialize, Serialize};

use crate::adaptive::LearningParameters;
use crate::error::MonitorError;
use crate::types::HealthSnapshot;

/// Default snapshots observed before the baseline is considered established.
pub const DEFAULT_BASELINE_WINDOW: usize = 12;
/// Default relative deviation from baseline that counts as an anomaly.
pub const DEFAULT_DEVIATION_PCT: f32 = 0.25;
/// Default consecutive anomalous snapshots before Emergency.
pub const DEFAULT_ESCALATION_AFTER: u32 = 2;
/// Default absolute quality floor; below it a snapshot is anomalous even
/// against a weak baseline.
pub const DEFAULT_MIN_QUALITY: f32 = 0.70;
/// Default ticks after a recalibration during which a repeat Emergency
/// escalates to a full reset.
pub const DEFAULT_RESET_COOLDOWN_TICKS: u32 = 24;

/// Monitor configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Snapshots observed before deviation checks begin
    pub baseline_window: usize,
    /// Relative deviation from baseline counting as an anomaly
    pub deviation_pct: f32,
    /// Consecutive anomalies before Emergency
    pub escalation_after: u32,
    /// Absolute quality floor
    pub min_quality: f32,
    /// Repeat-Emergency window that escalates Recalibrate to Reset
    pub reset_cooldown_ticks: u32,
    /// Parameter set applied on recalibration
    pub recalibration_target: LearningParameters,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            baseline_window: DEFAULT_BASELINE_WINDOW,
            deviation_pct: DEFAULT_DEVIATION_PCT,
            escalation_after: DEFAULT_ESCALATION_AFTER,
            min_quality: DEFAULT_MIN_QUALITY,
            reset_cooldown_ticks: DEFAULT_RESET_COOLDOWN_TICKS,
            recalibration_target: LearningParameters::safe_defaults(),
        }
    }
}

/// Monitor state machine phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorPhase {
    /// Collecting the initial baseline window
    Establishing,
    /// Operating within thresholds
    Nominal,
    /// One or more anomalous snapshots, below the escalation streak
    Degraded,
    /// Escalation threshold reached this tick (transient)
    Emergency,
    /// Recalibration issued; re-establishing baseline
    Recalibrating,
}

/// Action decided by one monitoring tick, applied by the runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum MonitorAction {
    /// Everything within thresholds
    NoAction,
    /// Atomically replace the learning parameters and clear gate latency
    /// histories
    Recalibrate(LearningParameters),
    /// Full emergency reset: parameters, gate histories and orchestrator
    /// metrics
    Reset,
}

/// The autonomous monitor.
///
/// `tick` only reads the snapshot slice and returns an action; applying the
/// action (parameter swap, gate history clear) is the runtime's job, so the
/// monitor can never block the main pipeline.
#[derive(Clone, Debug)]
pub struct AutonomousMonitor {
    config: MonitorConfig,
    phase: MonitorPhase,
    baseline: Option<Baseline>,
    accumulating: Vec<HealthSnapshot>,
    consecutive_anomalies: u32,
    ticks_since_recalibration: Option<u32>,
}

impl AutonomousMonitor {
    /// Create a monitor in the Establishing phase.
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            phase: MonitorPhase::Establishing,
            baseline: None,
            accumulating: Vec::new(),
            consecutive_anomalies: 0,
            ticks_since_recalibration: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    /// Established baseline, if any.
    pub fn baseline(&self) -> Option<&Baseline> {
        self.baseline.as_ref()
    }

    /// Current anomaly streak.
    pub fn consecutive_anomalies(&self) -> u32 {
        self.consecutive_anomalies
    }

    /// The parameter set applied on recalibration (and on reset).
    pub fn recalibration_target(&self) -> LearningParameters {
        self.config.recalibration_target
    }

    /// One monitoring tick: sample the newest snapshot, update the state
    /// machine, decide an action.
    ///
    /// # Errors
    ///
    /// [`MonitorError::RecalibrationFailed`] if the configured
    /// recalibration target fails bounds validation. This is fatal: the
    /// orchestrator halts new-cycle admission.
    pub fn tick(
        &mut self,
        history: &[HealthSnapshot],
    ) -> Result<MonitorAction, MonitorError> {
        if let Some(ticks) = self.ticks_since_recalibration.as_mut() {
            *ticks = ticks.saturating_add(1);
        }

        let Some(latest) = history.last() else {
            return Ok(MonitorAction::NoAction);
        };

        match self.phase {
            MonitorPhase::Establishing | MonitorPhase::Recalibrating => {
                self.accumulating.push(latest.clone());
                if self.accumulating.len() >= self.config.baseline_window {
                    let baseline = Baseline::from_snapshots(&self.accumulating);
                    tracing::info!(
                        quality = baseline.quality,
                        avg_latency_us = baseline.avg_latency_us,
                        throughput_hz = baseline.throughput_hz,
                        "baseline established, monitor nominal"
                    );
                    self.baseline = Some(baseline);
                    self.accumulating.clear();
                    self.phase = MonitorPhase::Nominal;
                }
                Ok(MonitorAction::NoAction)
            }
            MonitorPhase::Nominal | MonitorPhase::Degraded | MonitorPhase::Emergency => {
                self.evaluate(latest)
            }
        }
    }

    /// Deviation check against the established baseline.
    fn evaluate(&mut self, latest: &HealthSnapshot) -> Result<MonitorAction, MonitorError> {
        // Every evaluating phase implies an established baseline; if it is
        // ever missing, fall back to re-establishing one.
        let Some(baseline) = self.baseline.as_ref() else {
            self.phase = MonitorPhase::Establishing;
            return Ok(MonitorAction::NoAction);
        };
        let anomalous = baseline.deviates(latest, self.config.deviation_pct)
            || latest.quality < self.config.min_quality;

        if !anomalous {
            if self.phase == MonitorPhase::Degraded {
                tracing::info!("anomaly cleared, monitor back to nominal");
            }
            self.phase = MonitorPhase::Nominal;
            self.consecutive_anomalies = 0;
            return Ok(MonitorAction::NoAction);
        }

        self.consecutive_anomalies += 1;
        if self.consecutive_anomalies < self.config.escalation_after {
            tracing::warn!(
                quality = latest.quality,
                streak = self.consecutive_anomalies,
                "health deviation detected, monitor degraded"
            );
            self.phase = MonitorPhase::Degraded;
            return Ok(MonitorAction::NoAction);
        }

        // Escalate. The Emergency phase is transient: the same tick that
        // enters it also issues the healing action and moves on to
        // Recalibrating.
        self.phase = MonitorPhase::Emergency;
        let action = self.heal()?;
        self.phase = MonitorPhase::Recalibrating;
        self.baseline = None;
        self.accumulating.clear();
        self.consecutive_anomalies = 0;
        self.ticks_since_recalibration = Some(0);
        Ok(action)
    }

    /// Decide between recalibration and a full reset.
    fn heal(&mut self) -> Result<MonitorAction, MonitorError> {
        let target = self.config.recalibration_target;
        target
            .validate()
            .map_err(|e| MonitorError::RecalibrationFailed(e.to_string()))?;

        let repeat_emergency = self
            .ticks_since_recalibration
            .is_some_and(|ticks| ticks <= self.config.reset_cooldown_ticks);
        if repeat_emergency {
            tracing::error!("repeat emergency within cooldown, issuing full reset");
            Ok(MonitorAction::Reset)
        } else {
            tracing::warn!("emergency escalation, issuing recalibration");
            Ok(MonitorAction::Recalibrate(target))
        }
    }
}

//! Session orchestration: the per-cycle driver and its query surface.
//!
//! One cycle runs the fixed sequence
//!
//! ```text
//! sample -> FeatureExtractor -> VenturiPipeline -> AdaptiveCore -> publish
//! ```
//!
//! and always produces a [`CycleReport`]. Recoverable faults never abort a
//! cycle: extraction failures mark it `Skipped` and republish the prior
//! learning state, gate budget breaches mark it `Degraded`. The only way a
//! session stops admitting cycles is the halt latch, set when recalibration
//! fails or the sample source ends.
//!
//! [`LifeRuntime`](crate::session::LifeRuntime) owns the cadence; this module
//! owns the per-cycle semantics and the read-only history consumers poll.

mod runtime;

pub use runtime::LifeRuntime;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::adaptive::{AdaptiveCore, LearningParameters, NEUTRAL_ENV_FACTOR};
use crate::config::LifeConfig;
use crate::error::{ConfigError, FeatureError, GateError, LifeError, LifeResult};
use crate::feature::FeatureExtractor;
use crate::types::{
    CycleFault, CycleReport, CycleStatus, FeatureVector, HealthSnapshot, LearningState, RawSample,
};
use crate::venturi::VenturiPipeline;

/// Completed/skipped outcomes retained for the throughput estimate.
pub const THROUGHPUT_WINDOW: usize = 16;
/// End-to-end cycle latencies retained for the rolling average.
pub const CYCLE_LATENCY_WINDOW: usize = 32;

/// Weight of feature coherence in the cycle quality score.
const QUALITY_COHERENCE_WEIGHT: f32 = 0.4;
/// Weight of band-power sanity in the cycle quality score.
const QUALITY_BAND_WEIGHT: f32 = 0.3;
/// Weight of gate budget compliance in the cycle quality score.
const QUALITY_BUDGET_WEIGHT: f32 = 0.3;

/// Asynchronous provider of raw sample windows.
///
/// Implemented by the acquisition layer (device reader, replay file, test
/// script). Returning `None` ends the session: the orchestrator latches the
/// halt and stops admitting cycles.
#[async_trait]
pub trait SampleSource: Send {
    /// Deliver the next sample window, or `None` when the stream has ended.
    async fn next_sample(&mut self) -> Option<RawSample>;
}

/// Shared handle to the active learning parameters.
///
/// Readers take a cheap snapshot once per cycle; writers swap the whole
/// validated set atomically. A cycle therefore never observes a half-updated
/// parameter set.
#[derive(Clone)]
pub struct SharedParameters {
    inner: Arc<RwLock<Arc<LearningParameters>>>,
}

impl SharedParameters {
    /// Wrap an initial parameter set. The caller is expected to have
    /// validated it (the config loader does).
    pub fn new(params: LearningParameters) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(params))),
        }
    }

    /// Snapshot the active set. The snapshot stays coherent for the whole
    /// cycle even if a writer swaps mid-cycle.
    pub fn load(&self) -> Arc<LearningParameters> {
        Arc::clone(&self.inner.read())
    }

    /// Validate and atomically install a new set. Rejected sets leave the
    /// active one untouched.
    pub fn store(&self, params: LearningParameters) -> Result<(), ConfigError> {
        params.validate()?;
        *self.inner.write() = Arc::new(params);
        Ok(())
    }
}

impl Default for SharedParameters {
    fn default() -> Self {
        Self::new(LearningParameters::safe_defaults())
    }
}

/// Drives the processing sequence for one session and retains its history.
pub struct SessionOrchestrator {
    session_id: Uuid,
    extractor: FeatureExtractor,
    pipeline: VenturiPipeline,
    core: AdaptiveCore,
    params: SharedParameters,
    sample_timeout: Duration,
    nominal_rate_hz: f32,

    state: LearningState,
    state_history: VecDeque<LearningState>,
    state_history_cap: usize,
    health_history: VecDeque<HealthSnapshot>,
    health_history_cap: usize,
    last_report: Option<CycleReport>,

    cycles_run: u64,
    recent_outcomes: VecDeque<bool>,
    recent_latencies_us: VecDeque<u64>,
    consecutive_anomalies: u32,
    halted: Option<String>,
}

impl SessionOrchestrator {
    /// Build an orchestrator from a validated configuration.
    pub fn new(config: &LifeConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            extractor: FeatureExtractor::new(&config.feature),
            pipeline: VenturiPipeline::new(&config.gates),
            core: AdaptiveCore,
            params: SharedParameters::new(config.parameters),
            sample_timeout: Duration::from_millis(config.engine.sample_timeout_ms),
            nominal_rate_hz: 1_000.0 / config.engine.cycle_period_ms as f32,
            state: LearningState::initial(),
            state_history: VecDeque::with_capacity(config.engine.state_history),
            state_history_cap: config.engine.state_history,
            health_history: VecDeque::with_capacity(config.engine.health_history),
            health_history_cap: config.engine.health_history,
            last_report: None,
            cycles_run: 0,
            recent_outcomes: VecDeque::with_capacity(THROUGHPUT_WINDOW),
            recent_latencies_us: VecDeque::with_capacity(CYCLE_LATENCY_WINDOW),
            consecutive_anomalies: 0,
            halted: None,
        }
    }

    /// Run one cycle against the sample source.
    ///
    /// Waits up to the configured sample timeout; on timeout the documented
    /// no-signal placeholder is substituted and the cycle is recorded as
    /// skipped with a [`CycleFault::NoSignal`]. A source returning `None`
    /// latches the halt. Returns `Err` only from the halt latch.
    pub async fn run_cycle(
        &mut self,
        source: &mut (dyn SampleSource + '_),
    ) -> LifeResult<CycleReport> {
        if let Some(reason) = &self.halted {
            return Err(LifeError::Halted {
                reason: reason.clone(),
            });
        }

        let started = Instant::now();
        self.cycles_run += 1;

        let mut timed_out = false;
        let sample = match tokio::time::timeout(self.sample_timeout, source.next_sample()).await {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                let reason = "sample source ended".to_string();
                tracing::info!(session = %self.session_id, "{reason}");
                self.halted = Some(reason.clone());
                return Err(LifeError::Halted { reason });
            }
            Err(_) => {
                tracing::warn!(
                    session = %self.session_id,
                    cycle = self.cycles_run,
                    timeout_ms = self.sample_timeout.as_millis() as u64,
                    "no sample within cycle timeout, substituting no-signal window"
                );
                timed_out = true;
                RawSample::no_signal()
            }
        };

        let features = match self.extractor.extract(&sample) {
            Ok(features) => features,
            Err(err) => {
                let fault = if timed_out {
                    CycleFault::NoSignal
                } else {
                    map_feature_fault(&err)
                };
                tracing::warn!(
                    session = %self.session_id,
                    cycle = self.cycles_run,
                    error = %err,
                    "cycle skipped, republishing prior state"
                );
                return Ok(self.finish_skipped(fault, started));
            }
        };

        let pass = self.pipeline.process(features);
        let params = self.params.load();
        let next = self
            .core
            .advance(&pass.output, &params, &self.state, NEUTRAL_ENV_FACTOR);
        self.publish_state(next);

        let faults: Vec<CycleFault> = pass.faults.iter().map(map_gate_fault).collect();
        let status = if faults.is_empty() {
            CycleStatus::Completed
        } else {
            CycleStatus::Degraded
        };
        let quality = cycle_quality(&pass.output, faults.len());
        let total_latency_us = started.elapsed().as_micros() as u64;

        let report = CycleReport {
            cycle: self.cycles_run,
            status,
            faults,
            gate_latencies_us: pass.gate_latencies_us,
            total_latency_us,
            quality,
            stage: self.state.stage,
            neural_state: self.state.neural_state,
            timestamp: self.state.timestamp,
        };
        self.record_report(&report);
        Ok(report)
    }

    fn finish_skipped(&mut self, fault: CycleFault, started: Instant) -> CycleReport {
        // Republish the prior learning state so the published history stays
        // gap-free: one entry per admitted cycle.
        self.publish_state(self.state.clone());
        let report = CycleReport {
            cycle: self.cycles_run,
            status: CycleStatus::Skipped,
            faults: vec![fault],
            gate_latencies_us: [0; 3],
            total_latency_us: started.elapsed().as_micros() as u64,
            quality: 0.0,
            stage: self.state.stage,
            neural_state: self.state.neural_state,
            timestamp: self.state.timestamp,
        };
        self.record_report(&report);
        report
    }

    fn publish_state(&mut self, state: LearningState) {
        if self.state_history.len() == self.state_history_cap {
            self.state_history.pop_front();
        }
        self.state_history.push_back(state.clone());
        self.state = state;
    }

    fn record_report(&mut self, report: &CycleReport) {
        if self.recent_outcomes.len() == THROUGHPUT_WINDOW {
            self.recent_outcomes.pop_front();
        }
        self.recent_outcomes
            .push_back(report.counts_toward_throughput());
        if self.recent_latencies_us.len() == CYCLE_LATENCY_WINDOW {
            self.recent_latencies_us.pop_front();
        }
        self.recent_latencies_us.push_back(report.total_latency_us);

        let anomalous = report.status != CycleStatus::Completed;
        self.consecutive_anomalies = if anomalous {
            self.consecutive_anomalies + 1
        } else {
            0
        };

        let counted = self.recent_outcomes.iter().filter(|&&c| c).count();
        let throughput_hz =
            self.nominal_rate_hz * counted as f32 / self.recent_outcomes.len() as f32;
        let avg_latency_us = self.recent_latencies_us.iter().sum::<u64>()
            / self.recent_latencies_us.len().max(1) as u64;

        let snapshot = HealthSnapshot {
            quality: report.quality,
            avg_latency_us,
            throughput_hz,
            anomalous,
            consecutive_anomalies: self.consecutive_anomalies,
            timestamp: report.timestamp,
        };
        if self.health_history.len() == self.health_history_cap {
            self.health_history.pop_front();
        }
        self.health_history.push_back(snapshot);
        self.last_report = Some(report.clone());
    }

    // --- Monitor hooks ------------------------------------------------------

    /// Install a recalibrated parameter set and clear gate latency windows
    /// so the fresh baseline is not polluted by pre-recalibration latencies.
    pub fn apply_recalibrate(&mut self, target: LearningParameters) -> Result<(), ConfigError> {
        self.params.store(target)?;
        self.pipeline.reset_latency_histories();
        tracing::info!(session = %self.session_id, "recalibrated learning parameters");
        Ok(())
    }

    /// Full reset: recalibrated parameters plus cleared pipeline memory and
    /// health counters. Accumulated plasticity is deliberately preserved.
    pub fn apply_reset(&mut self, target: LearningParameters) -> Result<(), ConfigError> {
        self.params.store(target)?;
        self.pipeline.reset();
        self.recent_outcomes.clear();
        self.recent_latencies_us.clear();
        self.consecutive_anomalies = 0;
        tracing::warn!(session = %self.session_id, "full pipeline reset");
        Ok(())
    }

    /// Latch the halt: every subsequent `run_cycle` returns
    /// [`LifeError::Halted`] until an operator calls [`clear_halt`].
    ///
    /// [`clear_halt`]: SessionOrchestrator::clear_halt
    pub fn halt(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::error!(session = %self.session_id, "session halted: {reason}");
        self.halted = Some(reason);
    }

    /// Operator acknowledgement: release the halt latch.
    pub fn clear_halt(&mut self) {
        self.halted = None;
    }

    // --- Read-only query surface -------------------------------------------

    /// Session identifier.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The most recently published learning state.
    pub fn current_state(&self) -> &LearningState {
        &self.state
    }

    /// Up to `n` most recent learning states, oldest first.
    pub fn state_history(&self, n: usize) -> Vec<LearningState> {
        let skip = self.state_history.len().saturating_sub(n);
        self.state_history.iter().skip(skip).cloned().collect()
    }

    /// Up to `n` most recent health snapshots, oldest first.
    pub fn health_history(&self, n: usize) -> Vec<HealthSnapshot> {
        let skip = self.health_history.len().saturating_sub(n);
        self.health_history.iter().skip(skip).cloned().collect()
    }

    /// The last cycle report, if any cycle has run.
    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    /// Snapshot of the active learning parameters.
    pub fn parameters(&self) -> Arc<LearningParameters> {
        self.params.load()
    }

    /// A cloneable handle for external parameter updates.
    pub fn shared_parameters(&self) -> SharedParameters {
        self.params.clone()
    }

    /// Whether the halt latch is set.
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Total cycles admitted, including skipped ones.
    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }
}

/// Blend conditioned-feature coherence, band sanity and gate budget
/// compliance into the per-cycle quality score.
fn cycle_quality(output: &FeatureVector, breached_gates: usize) -> f32 {
    let band_sanity = if output.bands.is_valid() && output.bands.total() > 0.0 {
        1.0
    } else {
        0.0
    };
    let budget_compliance = (3 - breached_gates.min(3)) as f32 / 3.0;
    (QUALITY_COHERENCE_WEIGHT * output.coherence.clamp(0.0, 1.0)
        + QUALITY_BAND_WEIGHT * band_sanity
        + QUALITY_BUDGET_WEIGHT * budget_compliance)
        .clamp(0.0, 1.0)
}

fn map_feature_fault(err: &FeatureError) -> CycleFault {
    match err {
        FeatureError::InsufficientSamples { .. } => CycleFault::InsufficientSamples,
        FeatureError::InvalidChannelData { channel, .. } => CycleFault::InvalidChannelData {
            channel: *channel,
        },
    }
}

fn map_gate_fault(err: &GateError) -> CycleFault {
    match err {
        GateError::BudgetExceeded {
            gate, observed_us, ..
        } => CycleFault::GateBudgetExceeded {
            gate: *gate,
            observed_us: *observed_us,
        },
    }
}

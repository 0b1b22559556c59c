//! Individual Venturi gates and their runtime state.
//!
//! Each gate pairs a feature-vector transform with a [`GateState`] that
//! tracks its optimization factor, latency budget, rolling observed
//! latency, breach streak and throughput. Budgets are advisory: a breach
//! degrades the cycle's quality score, it never aborts the cycle.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::GateError;
use crate::types::FeatureVector;

/// Rolling latency window size per gate.
pub const LATENCY_WINDOW: usize = 32;

/// Contrast gain applied per unit of optimization factor in the
/// pressure-differential transform.
pub const CONTRAST_GAIN: f32 = 0.1;

/// The three pipeline stages, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Gate 1: gain/normalization, tightest budget
    Acceleration,
    /// Gate 2: contrast against the previous cycle's vector
    PressureDifferential,
    /// Gate 3: EMA smoothing, most generous budget
    FlowRecovery,
}

/// Static configuration for one gate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GateConfig {
    /// Transform strength; must be > 0
    pub optimization_factor: f32,
    /// Latency budget in microseconds; must be > 0
    pub budget_us: u64,
}

/// Per-gate runtime state.
///
/// Mutated only by its own gate logic and by the autonomous monitor during
/// recalibration (via [`reset_latency_history`]); never by the feature
/// extractor or the adaptive core.
///
/// [`reset_latency_history`]: GateState::reset_latency_history
#[derive(Clone, Debug)]
pub struct GateState {
    kind: GateKind,
    /// Transform strength
    pub optimization_factor: f32,
    /// Advisory latency budget in microseconds
    pub budget_us: u64,
    /// Breaches tolerated before `BudgetExceeded` is signalled
    pub breach_tolerance: u32,
    latencies_us: VecDeque<u64>,
    consecutive_breaches: u32,
    throughput: u64,
}

impl GateState {
    /// Create gate state from configuration.
    pub fn new(kind: GateKind, config: GateConfig, breach_tolerance: u32) -> Self {
        Self {
            kind,
            optimization_factor: config.optimization_factor,
            budget_us: config.budget_us,
            breach_tolerance,
            latencies_us: VecDeque::with_capacity(LATENCY_WINDOW),
            consecutive_breaches: 0,
            throughput: 0,
        }
    }

    /// Which gate this state belongs to.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Record one observed latency and bump throughput.
    ///
    /// Returns `GateError::BudgetExceeded` once the breach streak passes the
    /// tolerance; the caller records the fault and continues the cycle.
    pub fn record_latency(&mut self, observed_us: u64) -> Result<(), GateError> {
        if self.latencies_us.len() == LATENCY_WINDOW {
            self.latencies_us.pop_front();
        }
        self.latencies_us.push_back(observed_us);
        self.throughput += 1;

        if observed_us > self.budget_us {
            self.consecutive_breaches += 1;
            if self.consecutive_breaches > self.breach_tolerance {
                return Err(GateError::BudgetExceeded {
                    gate: self.kind,
                    observed_us,
                    budget_us: self.budget_us,
                    consecutive: self.consecutive_breaches,
                });
            }
        } else {
            self.consecutive_breaches = 0;
        }
        Ok(())
    }

    /// Rolling average of observed latency, microseconds.
    pub fn avg_latency_us(&self) -> u64 {
        if self.latencies_us.is_empty() {
            return 0;
        }
        self.latencies_us.iter().sum::<u64>() / self.latencies_us.len() as u64
    }

    /// Calls processed since construction or the last full reset.
    pub fn throughput(&self) -> u64 {
        self.throughput
    }

    /// Current breach streak.
    pub fn consecutive_breaches(&self) -> u32 {
        self.consecutive_breaches
    }

    /// Clear the rolling latency window and breach streak.
    ///
    /// Called during recalibration so stale measurements don't bias the
    /// next baseline. Throughput is preserved.
    pub fn reset_latency_history(&mut self) {
        self.latencies_us.clear();
        self.consecutive_breaches = 0;
    }
}

/// Gate 1: gain/normalization.
///
/// Amplifies the band-power components by the optimization factor and
/// renormalizes them to preserve the window's total power, sharpening the
/// dominant band. Unit-range scalars pass through untouched.
pub fn accelerate(input: &FeatureVector, factor: f32) -> FeatureVector {
    let mut c = input.components();
    let total: f32 = c[..5].iter().sum();
    if total > 0.0 {
        // Power-law sharpening: raise each band to `factor`, renormalize
        let mut sharpened = [0.0f32; 5];
        let mut sharp_total = 0.0f32;
        for (i, s) in sharpened.iter_mut().enumerate() {
            *s = (c[i] / total).powf(factor);
            sharp_total += *s;
        }
        if sharp_total > 0.0 {
            for (i, s) in sharpened.iter().enumerate() {
                c[i] = s / sharp_total * total;
            }
        }
    }
    FeatureVector::from_components(c)
}

/// Gate 2: pressure differential.
///
/// Adds a contrast term proportional to the change since the previous
/// cycle: `out = cur + factor * CONTRAST_GAIN * (cur - prev)`. The first
/// cycle after startup contrasts against the zero vector.
pub fn pressure_differential(
    input: &FeatureVector,
    previous: &FeatureVector,
    factor: f32,
) -> FeatureVector {
    let cur = input.components();
    let prev = previous.components();
    let k = factor * CONTRAST_GAIN;
    let mut out = [0.0f32; 9];
    for i in 0..9 {
        out[i] = cur[i] + k * (cur[i] - prev[i]);
    }
    sanitize(FeatureVector::from_components(out))
}

/// Gate 3: flow recovery.
///
/// Exponential moving average toward the incoming vector with
/// `alpha = factor / (factor + 1)`; higher factors track the input more
/// tightly, lower factors smooth harder. The first call adopts the input
/// as the EMA seed.
pub fn flow_recovery(
    input: &FeatureVector,
    ema: Option<&FeatureVector>,
    factor: f32,
) -> FeatureVector {
    let Some(ema) = ema else {
        return input.clone();
    };
    let alpha = factor / (factor + 1.0);
    let cur = input.components();
    let prev = ema.components();
    let mut out = [0.0f32; 9];
    for i in 0..9 {
        out[i] = alpha * cur[i] + (1.0 - alpha) * prev[i];
    }
    sanitize(FeatureVector::from_components(out))
}

/// Re-establish component invariants after a transform: band powers stay
/// non-negative, unit-range scalars stay in [0, 1].
fn sanitize(mut fv: FeatureVector) -> FeatureVector {
    fv.bands.delta = fv.bands.delta.max(0.0);
    fv.bands.theta = fv.bands.theta.max(0.0);
    fv.bands.alpha = fv.bands.alpha.max(0.0);
    fv.bands.beta = fv.bands.beta.max(0.0);
    fv.bands.gamma = fv.bands.gamma.max(0.0);
    fv.coherence = fv.coherence.clamp(0.0, 1.0);
    fv.engagement = fv.engagement.clamp(0.0, 1.0);
    fv.focus = fv.focus.clamp(0.0, 1.0);
    fv.stress = fv.stress.clamp(0.0, 1.0);
    fv
}

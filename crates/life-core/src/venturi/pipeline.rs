//! The three-stage Venturi pipeline.
//!
//! Feature vectors flow Acceleration → Pressure-Differential →
//! Flow-Recovery before reaching the adaptive core. Staging keeps each
//! transform's optimization factor independently tunable and lets the
//! monitor attribute a latency or quality regression to a specific gate.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::GateError;
use crate::types::FeatureVector;
use crate::venturi::gate::{
    accelerate, flow_recovery, pressure_differential, GateConfig, GateKind, GateState,
};

/// Default breach streak tolerated before a gate signals `BudgetExceeded`.
pub const DEFAULT_BREACH_TOLERANCE: u32 = 3;

/// Pipeline configuration: one [`GateConfig`] per stage plus the shared
/// breach tolerance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VenturiConfig {
    /// Gate 1 (tightest budget)
    pub acceleration: GateConfig,
    /// Gate 2
    pub pressure: GateConfig,
    /// Gate 3 (most generous budget, highest throughput target)
    pub recovery: GateConfig,
    /// Consecutive over-budget calls tolerated before signalling
    pub breach_tolerance: u32,
}

impl Default for VenturiConfig {
    fn default() -> Self {
        Self {
            acceleration: GateConfig {
                optimization_factor: 3.5,
                budget_us: 400,
            },
            pressure: GateConfig {
                optimization_factor: 2.8,
                budget_us: 800,
            },
            recovery: GateConfig {
                optimization_factor: 4.2,
                budget_us: 2_000,
            },
            breach_tolerance: DEFAULT_BREACH_TOLERANCE,
        }
    }
}

impl VenturiConfig {
    /// Sum of the three gate budgets, microseconds.
    pub fn total_budget_us(&self) -> u64 {
        self.acceleration.budget_us + self.pressure.budget_us + self.recovery.budget_us
    }
}

/// Outcome of one pipeline pass.
#[derive(Clone, Debug)]
pub struct PipelinePass {
    /// Conditioned feature vector handed to the adaptive core
    pub output: FeatureVector,
    /// Observed latency per gate, pipeline order, microseconds
    pub gate_latencies_us: [u64; 3],
    /// Non-fatal budget breaches recorded during the pass
    pub faults: Vec<GateError>,
}

/// The three chained gates with their pipeline-owned inter-cycle state.
#[derive(Clone, Debug)]
pub struct VenturiPipeline {
    accel: GateState,
    pressure: GateState,
    recovery: GateState,
    /// Previous cycle's gate-1 output, gate 2's contrast baseline
    previous: FeatureVector,
    /// Gate 3's EMA accumulator; `None` until the first pass
    ema: Option<FeatureVector>,
}

impl VenturiPipeline {
    /// Build the pipeline from configuration.
    pub fn new(config: &VenturiConfig) -> Self {
        Self {
            accel: GateState::new(
                GateKind::Acceleration,
                config.acceleration,
                config.breach_tolerance,
            ),
            pressure: GateState::new(
                GateKind::PressureDifferential,
                config.pressure,
                config.breach_tolerance,
            ),
            recovery: GateState::new(
                GateKind::FlowRecovery,
                config.recovery,
                config.breach_tolerance,
            ),
            previous: FeatureVector::zero(),
            ema: None,
        }
    }

    /// Run one feature vector through all three gates.
    ///
    /// Latency is measured per gate with a monotonic clock; budget breaches
    /// are collected as faults, never propagated — the cycle always gets an
    /// output vector.
    pub fn process(&mut self, input: FeatureVector) -> PipelinePass {
        let mut faults = Vec::new();
        let mut latencies = [0u64; 3];

        // Gate 1: acceleration
        let start = Instant::now();
        let accelerated = accelerate(&input, self.accel.optimization_factor);
        latencies[0] = start.elapsed().as_micros() as u64;
        if let Err(fault) = self.accel.record_latency(latencies[0]) {
            tracing::warn!(gate = ?GateKind::Acceleration, "{fault}");
            faults.push(fault);
        }

        // Gate 2: pressure differential against the previous cycle
        let start = Instant::now();
        let contrasted = pressure_differential(
            &accelerated,
            &self.previous,
            self.pressure.optimization_factor,
        );
        latencies[1] = start.elapsed().as_micros() as u64;
        if let Err(fault) = self.pressure.record_latency(latencies[1]) {
            tracing::warn!(gate = ?GateKind::PressureDifferential, "{fault}");
            faults.push(fault);
        }
        self.previous = accelerated;

        // Gate 3: flow recovery (EMA smoothing)
        let start = Instant::now();
        let smoothed = flow_recovery(
            &contrasted,
            self.ema.as_ref(),
            self.recovery.optimization_factor,
        );
        latencies[2] = start.elapsed().as_micros() as u64;
        if let Err(fault) = self.recovery.record_latency(latencies[2]) {
            tracing::warn!(gate = ?GateKind::FlowRecovery, "{fault}");
            faults.push(fault);
        }
        self.ema = Some(smoothed.clone());

        PipelinePass {
            output: smoothed,
            gate_latencies_us: latencies,
            faults,
        }
    }

    /// Gate state in pipeline order, for telemetry.
    pub fn gate_states(&self) -> [&GateState; 3] {
        [&self.accel, &self.pressure, &self.recovery]
    }

    /// Clear every gate's rolling latency window and breach streak.
    ///
    /// Invoked on recalibration so stale measurements don't bias the fresh
    /// baseline.
    pub fn reset_latency_histories(&mut self) {
        self.accel.reset_latency_history();
        self.pressure.reset_latency_history();
        self.recovery.reset_latency_history();
    }

    /// Full reset: latency histories plus the inter-cycle contrast and EMA
    /// state. Used by the monitor's emergency `Reset` action.
    pub fn reset(&mut self) {
        self.reset_latency_histories();
        self.previous = FeatureVector::zero();
        self.ema = None;
    }
}

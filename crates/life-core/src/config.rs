//! Engine configuration, loaded from TOML and validated at startup.
//!
//! The engine refuses to start with out-of-range values: [`validate`]
//! returns the first violation instead of clamping. Every section has
//! defaults, so an empty TOML document yields a runnable configuration.
//!
//! ```toml
//! [engine]
//! cycle_period_ms = 1000
//! monitor_period_ms = 5000
//!
//! [parameters]
//! adaptation_rate = 0.1
//! saturation_level = 10.0
//!
//! [gates.acceleration]
//! optimization_factor = 3.5
//! budget_us = 400
//! ```
//!
//! [`validate`]: LifeConfig::validate

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::adaptive::LearningParameters;
use crate::error::ConfigError;
use crate::feature::FeatureConfig;
use crate::monitor::MonitorConfig;
use crate::venturi::VenturiConfig;

/// Default main cycle period, milliseconds.
pub const DEFAULT_CYCLE_PERIOD_MS: u64 = 1_000;
/// Default monitoring tick period, milliseconds.
pub const DEFAULT_MONITOR_PERIOD_MS: u64 = 5_000;
/// Default wait for a sample before substituting the no-signal placeholder.
pub const DEFAULT_SAMPLE_TIMEOUT_MS: u64 = 250;
/// Default learning-state ring buffer length.
pub const DEFAULT_STATE_HISTORY: usize = 128;
/// Default health-snapshot history length.
pub const DEFAULT_HEALTH_HISTORY: usize = 256;

/// Cadence and history sizing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Main processing cycle period, milliseconds
    pub cycle_period_ms: u64,
    /// Monitoring tick period, milliseconds
    pub monitor_period_ms: u64,
    /// Sample-source wait before the no-signal placeholder is substituted
    pub sample_timeout_ms: u64,
    /// Learning states retained for consumers and baseline computation
    pub state_history: usize,
    /// Health snapshots retained
    pub health_history: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_period_ms: DEFAULT_CYCLE_PERIOD_MS,
            monitor_period_ms: DEFAULT_MONITOR_PERIOD_MS,
            sample_timeout_ms: DEFAULT_SAMPLE_TIMEOUT_MS,
            state_history: DEFAULT_STATE_HISTORY,
            health_history: DEFAULT_HEALTH_HISTORY,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    /// Cadence and history sizing
    pub engine: EngineConfig,
    /// Feature-extractor settings
    pub feature: FeatureConfig,
    /// Venturi gate factors and budgets
    pub gates: VenturiConfig,
    /// Initial learning parameters
    pub parameters: LearningParameters,
    /// Autonomous monitor thresholds
    pub monitor: MonitorConfig,
}

impl LifeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every field against its documented range.
    ///
    /// Returns the first violation. Called by the loaders and again by the
    /// runtime before startup, so a hand-built config cannot bypass it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.cycle_period_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "engine.cycle_period_ms",
                value: 0.0,
                allowed: "> 0",
            });
        }
        if self.engine.monitor_period_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "engine.monitor_period_ms",
                value: 0.0,
                allowed: "> 0",
            });
        }
        if self.engine.state_history == 0 {
            return Err(ConfigError::OutOfRange {
                field: "engine.state_history",
                value: 0.0,
                allowed: ">= 1",
            });
        }
        if self.engine.health_history == 0 {
            return Err(ConfigError::OutOfRange {
                field: "engine.health_history",
                value: 0.0,
                allowed: ">= 1",
            });
        }

        if !self.feature.segment_len.is_power_of_two() || self.feature.segment_len < 64 {
            return Err(ConfigError::OutOfRange {
                field: "feature.segment_len",
                value: self.feature.segment_len as f64,
                allowed: "power of two >= 64",
            });
        }

        for (factor_field, budget_field, gate) in [
            (
                "gates.acceleration.optimization_factor",
                "gates.acceleration.budget_us",
                &self.gates.acceleration,
            ),
            (
                "gates.pressure.optimization_factor",
                "gates.pressure.budget_us",
                &self.gates.pressure,
            ),
            (
                "gates.recovery.optimization_factor",
                "gates.recovery.budget_us",
                &self.gates.recovery,
            ),
        ] {
            if !gate.optimization_factor.is_finite() || gate.optimization_factor <= 0.0 {
                return Err(ConfigError::OutOfRange {
                    field: factor_field,
                    value: gate.optimization_factor as f64,
                    allowed: "> 0",
                });
            }
            if gate.budget_us == 0 {
                return Err(ConfigError::OutOfRange {
                    field: budget_field,
                    value: 0.0,
                    allowed: "> 0",
                });
            }
        }
        let cycle_us = self.engine.cycle_period_ms * 1_000;
        let budgets_us = self.gates.total_budget_us();
        if budgets_us >= cycle_us {
            return Err(ConfigError::BudgetOverflow {
                budgets_us,
                cycle_us,
            });
        }

        self.parameters.validate()?;

        if self.monitor.baseline_window == 0 {
            return Err(ConfigError::OutOfRange {
                field: "monitor.baseline_window",
                value: 0.0,
                allowed: ">= 1",
            });
        }
        if !self.monitor.deviation_pct.is_finite()
            || self.monitor.deviation_pct <= 0.0
            || self.monitor.deviation_pct > 1.0
        {
            return Err(ConfigError::OutOfRange {
                field: "monitor.deviation_pct",
                value: self.monitor.deviation_pct as f64,
                allowed: "(0, 1]",
            });
        }
        if self.monitor.escalation_after == 0 {
            return Err(ConfigError::OutOfRange {
                field: "monitor.escalation_after",
                value: 0.0,
                allowed: ">= 1",
            });
        }
        if !(0.0..=1.0).contains(&self.monitor.min_quality) {
            return Err(ConfigError::OutOfRange {
                field: "monitor.min_quality",
                value: self.monitor.min_quality as f64,
                allowed: "[0, 1]",
            });
        }
        self.monitor.recalibration_target.validate()?;

        Ok(())
    }
}

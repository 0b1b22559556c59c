//! Single-task engine runtime.
//!
//! Cycles and monitoring ticks both run on one cooperative task driven by
//! `tokio::select!` over two intervals, so a monitoring tick can never
//! observe a cycle mid-flight and monitor actions apply between cycles.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::config::LifeConfig;
use crate::error::{ConfigError, LifeError, MonitorError};
use crate::monitor::{AutonomousMonitor, MonitorAction};
use crate::session::{SampleSource, SessionOrchestrator};

/// Owns the orchestrator and monitor and drives them at the configured
/// cadence until shutdown or halt.
pub struct LifeRuntime {
    orchestrator: SessionOrchestrator,
    monitor: AutonomousMonitor,
    cycle_period: Duration,
    monitor_period: Duration,
    monitor_window: usize,
}

impl LifeRuntime {
    /// Validate the configuration and assemble the runtime.
    pub fn new(config: &LifeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            orchestrator: SessionOrchestrator::new(config),
            monitor: AutonomousMonitor::new(config.monitor.clone()),
            cycle_period: Duration::from_millis(config.engine.cycle_period_ms),
            monitor_period: Duration::from_millis(config.engine.monitor_period_ms),
            monitor_window: config.monitor.baseline_window,
        })
    }

    /// Access the orchestrator before the loop starts (for wiring consumers
    /// to the shared parameter handle or reading the session id).
    pub fn orchestrator(&self) -> &SessionOrchestrator {
        &self.orchestrator
    }

    /// Run until `shutdown` flips to `true`, the sample source ends, or a
    /// failed recalibration halts the session. Returns the orchestrator so
    /// callers can inspect the final histories and the halt latch.
    pub async fn run<S: SampleSource>(
        mut self,
        mut source: S,
        mut shutdown: watch::Receiver<bool>,
    ) -> SessionOrchestrator {
        let mut cycle_tick = tokio::time::interval(self.cycle_period);
        let mut monitor_tick = tokio::time::interval(self.monitor_period);
        cycle_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        monitor_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            session = %self.orchestrator.session_id(),
            cycle_ms = self.cycle_period.as_millis() as u64,
            monitor_ms = self.monitor_period.as_millis() as u64,
            "engine running"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!(
                            session = %self.orchestrator.session_id(),
                            "shutdown requested"
                        );
                        break;
                    }
                }
                _ = cycle_tick.tick() => {
                    match self.orchestrator.run_cycle(&mut source).await {
                        Ok(report) => {
                            tracing::debug!(
                                cycle = report.cycle,
                                status = ?report.status,
                                quality = report.quality,
                                latency_us = report.total_latency_us,
                                "cycle complete"
                            );
                        }
                        Err(LifeError::Halted { reason }) => {
                            tracing::error!("stopping: {reason}");
                            break;
                        }
                        Err(err) => {
                            tracing::error!(error = %err, "unrecoverable cycle error");
                            self.orchestrator.halt(err.to_string());
                            break;
                        }
                    }
                }
                _ = monitor_tick.tick() => {
                    if self.monitor_step().is_err() {
                        break;
                    }
                }
            }
        }
        self.orchestrator
    }

    /// One monitoring tick: evaluate recent health and apply the resulting
    /// action. `Err` means the session was halted.
    fn monitor_step(&mut self) -> Result<(), ()> {
        let history = self.orchestrator.health_history(self.monitor_window);
        match self.monitor.tick(&history) {
            Ok(MonitorAction::NoAction) => Ok(()),
            Ok(MonitorAction::Recalibrate(target)) => {
                // Target was validated by the monitor before it got here.
                if let Err(err) = self.orchestrator.apply_recalibrate(target) {
                    self.orchestrator.halt(err.to_string());
                    return Err(());
                }
                Ok(())
            }
            Ok(MonitorAction::Reset) => {
                let target = self.monitor.recalibration_target();
                if let Err(err) = self.orchestrator.apply_reset(target) {
                    self.orchestrator.halt(err.to_string());
                    return Err(());
                }
                Ok(())
            }
            Err(MonitorError::RecalibrationFailed(reason)) => {
                self.orchestrator
                    .halt(format!("recalibration failed: {reason}"));
                Err(())
            }
        }
    }
}

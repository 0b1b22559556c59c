//! State-machine tests for the autonomous monitor.
//!
//! Ticks are the monitor's time unit, so escalation scenarios run without
//! wall-clock waits: each test drives `tick` with a synthetic snapshot
//! history.

use super::*;
use crate::types::HealthSnapshot;

fn good() -> HealthSnapshot {
    HealthSnapshot::nominal(0.9, 1000, 1.0)
}

fn bad() -> HealthSnapshot {
    HealthSnapshot::nominal(0.3, 5000, 0.2)
}

fn config() -> MonitorConfig {
    MonitorConfig {
        baseline_window: 4,
        ..Default::default()
    }
}

/// Drive the monitor through baseline establishment with good snapshots.
fn established_monitor() -> (AutonomousMonitor, Vec<HealthSnapshot>) {
    let mut monitor = AutonomousMonitor::new(config());
    let mut history = Vec::new();
    for _ in 0..4 {
        history.push(good());
        let action = monitor.tick(&history).expect("tick");
        assert_eq!(action, MonitorAction::NoAction);
    }
    assert_eq!(monitor.phase(), MonitorPhase::Nominal);
    (monitor, history)
}

#[test]
fn starts_establishing_and_reaches_nominal() {
    let mut monitor = AutonomousMonitor::new(config());
    assert_eq!(monitor.phase(), MonitorPhase::Establishing);
    let mut history = Vec::new();
    for i in 0..4 {
        history.push(good());
        monitor.tick(&history).expect("tick");
        if i < 3 {
            assert_eq!(monitor.phase(), MonitorPhase::Establishing);
        }
    }
    assert_eq!(monitor.phase(), MonitorPhase::Nominal);
    assert!(monitor.baseline().is_some());
}

#[test]
fn empty_history_is_no_action() {
    let mut monitor = AutonomousMonitor::new(config());
    let action = monitor.tick(&[]).expect("tick");
    assert_eq!(action, MonitorAction::NoAction);
    assert_eq!(monitor.phase(), MonitorPhase::Establishing);
}

#[test]
fn single_deviation_degrades_but_never_reaches_emergency() {
    let (mut monitor, mut history) = established_monitor();

    history.push(bad());
    let action = monitor.tick(&history).expect("tick");
    assert_eq!(action, MonitorAction::NoAction);
    assert_eq!(monitor.phase(), MonitorPhase::Degraded);

    // Recovery clears the streak
    history.push(good());
    let action = monitor.tick(&history).expect("tick");
    assert_eq!(action, MonitorAction::NoAction);
    assert_eq!(monitor.phase(), MonitorPhase::Nominal);
    assert_eq!(monitor.consecutive_anomalies(), 0);
}

#[test]
fn two_consecutive_deviations_escalate_with_exactly_one_recalibrate() {
    let (mut monitor, mut history) = established_monitor();

    history.push(bad());
    monitor.tick(&history).expect("tick");
    assert_eq!(monitor.phase(), MonitorPhase::Degraded);

    history.push(bad());
    let action = monitor.tick(&history).expect("tick");
    let MonitorAction::Recalibrate(params) = action else {
        panic!("expected Recalibrate, got {action:?}");
    };
    params.validate().expect("recalibration target must be valid");
    assert_eq!(monitor.phase(), MonitorPhase::Recalibrating);

    // Continued bad snapshots while recalibrating feed the fresh baseline
    // window; no second action is issued.
    for _ in 0..3 {
        history.push(bad());
        let action = monitor.tick(&history).expect("tick");
        assert_eq!(action, MonitorAction::NoAction);
    }
}

#[test]
fn baseline_is_reestablished_after_recalibration() {
    let (mut monitor, mut history) = established_monitor();
    history.push(bad());
    monitor.tick(&history).expect("tick");
    history.push(bad());
    monitor.tick(&history).expect("tick");
    assert_eq!(monitor.phase(), MonitorPhase::Recalibrating);
    assert!(monitor.baseline().is_none());

    for _ in 0..4 {
        history.push(good());
        monitor.tick(&history).expect("tick");
    }
    assert_eq!(monitor.phase(), MonitorPhase::Nominal);
    assert!(monitor.baseline().is_some());
}

#[test]
fn repeat_emergency_within_cooldown_escalates_to_reset() {
    let (mut monitor, mut history) = established_monitor();

    // First emergency: recalibrate
    history.push(bad());
    monitor.tick(&history).expect("tick");
    history.push(bad());
    let action = monitor.tick(&history).expect("tick");
    assert!(matches!(action, MonitorAction::Recalibrate(_)));

    // Re-establish baseline (4 ticks), then fail again within the cooldown
    for _ in 0..4 {
        history.push(good());
        monitor.tick(&history).expect("tick");
    }
    history.push(bad());
    monitor.tick(&history).expect("tick");
    history.push(bad());
    let action = monitor.tick(&history).expect("tick");
    assert_eq!(action, MonitorAction::Reset);
}

#[test]
fn emergency_long_after_recalibration_recalibrates_again() {
    let mut cfg = config();
    cfg.reset_cooldown_ticks = 3;
    let mut monitor = AutonomousMonitor::new(cfg);
    let mut history = Vec::new();
    for _ in 0..4 {
        history.push(good());
        monitor.tick(&history).expect("tick");
    }

    // First emergency
    history.push(bad());
    monitor.tick(&history).expect("tick");
    history.push(bad());
    assert!(matches!(
        monitor.tick(&history).expect("tick"),
        MonitorAction::Recalibrate(_)
    ));

    // Many nominal ticks push well past the cooldown
    for _ in 0..10 {
        history.push(good());
        monitor.tick(&history).expect("tick");
    }
    history.push(bad());
    monitor.tick(&history).expect("tick");
    history.push(bad());
    assert!(matches!(
        monitor.tick(&history).expect("tick"),
        MonitorAction::Recalibrate(_)
    ));
}

#[test]
fn invalid_recalibration_target_is_fatal() {
    let mut cfg = config();
    cfg.recalibration_target = LearningParameters {
        adaptation_rate: 2.0,
        ..LearningParameters::safe_defaults()
    };
    let mut monitor = AutonomousMonitor::new(cfg);
    let mut history = Vec::new();
    for _ in 0..4 {
        history.push(good());
        monitor.tick(&history).expect("tick");
    }
    history.push(bad());
    monitor.tick(&history).expect("tick");
    history.push(bad());
    let err = monitor.tick(&history).unwrap_err();
    assert!(matches!(err, MonitorError::RecalibrationFailed(_)));
}

#[test]
fn absolute_quality_floor_triggers_even_with_low_baseline() {
    // Baseline established from mediocre-but-stable snapshots; a snapshot
    // under the absolute floor is anomalous even within 25% of baseline
    let mut monitor = AutonomousMonitor::new(config());
    let mut history = Vec::new();
    for _ in 0..4 {
        history.push(HealthSnapshot::nominal(0.72, 1000, 1.0));
        monitor.tick(&history).expect("tick");
    }
    assert_eq!(monitor.phase(), MonitorPhase::Nominal);

    history.push(HealthSnapshot::nominal(0.65, 1000, 1.0));
    monitor.tick(&history).expect("tick");
    assert_eq!(monitor.phase(), MonitorPhase::Degraded);
}

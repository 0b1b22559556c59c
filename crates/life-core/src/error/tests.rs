//! Tests for the unified error hierarchy.

use super::*;
use crate::venturi::GateKind;

#[test]
fn feature_errors_are_recoverable() {
    let err = LifeError::from(FeatureError::InsufficientSamples { got: 4, needed: 64 });
    assert!(err.is_recoverable());
    assert!(!err.is_fatal());

    let err = LifeError::from(FeatureError::InvalidChannelData { channel: 2, index: 17 });
    assert!(err.is_recoverable());
}

#[test]
fn gate_budget_breach_is_recoverable() {
    let err = LifeError::from(GateError::BudgetExceeded {
        gate: GateKind::Acceleration,
        observed_us: 950,
        budget_us: 400,
        consecutive: 4,
    });
    assert!(err.is_recoverable());
    assert!(!err.is_fatal());
}

#[test]
fn monitor_and_config_errors_are_fatal() {
    let err = LifeError::from(MonitorError::RecalibrationFailed(
        "adaptation_rate out of range".to_string(),
    ));
    assert!(err.is_fatal());
    assert!(!err.is_recoverable());

    let err = LifeError::from(ConfigError::OutOfRange {
        field: "parameters.adaptation_rate",
        value: 1.5,
        allowed: "[0, 1]",
    });
    assert!(err.is_fatal());
}

#[test]
fn halted_is_fatal() {
    let err = LifeError::Halted {
        reason: "recalibration failed".to_string(),
    };
    assert!(err.is_fatal());
}

#[test]
fn error_messages_name_the_offender() {
    let err = GateError::BudgetExceeded {
        gate: GateKind::FlowRecovery,
        observed_us: 5000,
        budget_us: 2000,
        consecutive: 4,
    };
    let msg = err.to_string();
    assert!(msg.contains("FlowRecovery"));
    assert!(msg.contains("5000"));
    assert!(msg.contains("2000"));
}

//! End-to-end tick scenarios with default limits.

use amnion_common::controller::state::SafetyState;
use serde_json::json;

use super::{controller, sanitize, with, without};

#[test]
fn nominal_input_passes_request_through() {
    let mut c = controller();
    let out = c.tick_value(&with(json!({ "desired_u": 0.3 })));
    assert_eq!(out.state, SafetyState::Normal);
    assert_eq!(out.u_cmd, 0.3);
    assert_eq!(c.evaluator().latch().violation_streak(), 0);
}

#[test]
fn coherence_collapse_enters_barrier() {
    let mut c = controller();
    let (verdict, out) = {
        let frame = sanitize(&with(json!({ "coherence": 0.1, "desired_u": 0.9 })));
        c.step(&frame)
    };
    assert_eq!(verdict.state, SafetyState::Barrier);
    assert!(verdict.has_reason("coherence_collapse:"));
    assert_eq!(out.state, SafetyState::Barrier);
    assert_eq!(out.coupling, 0.0);
    assert!(out.u_cmd <= verdict.limits.power_budget_min);
}

#[test]
fn repeated_power_overflow_latches_safe_halt() {
    let mut c = controller();
    let overflow = with(json!({ "power_draw": 1.5, "desired_u": 0.8 }));

    assert_eq!(c.tick_value(&overflow).state, SafetyState::Barrier);
    assert_eq!(c.tick_value(&overflow).state, SafetyState::Barrier);
    let third = c.tick_value(&overflow);
    assert_eq!(third.state, SafetyState::SafeHalt);
    assert_eq!(third.u_cmd, 0.0);

    let fourth = c.tick_value(&with(json!({ "desired_u": 0.8 })));
    assert_eq!(fourth.state, SafetyState::SafeHalt);
    assert_eq!(fourth.u_cmd, 0.0);
}

#[test]
fn missing_coherence_blocks_control() {
    let mut c = controller();
    let frame = sanitize(&without("coherence"));
    let (verdict, out) = c.step(&frame);
    assert_eq!(verdict.state, SafetyState::Barrier);
    assert!(!verdict.allow_control);
    assert_eq!(verdict.reasons, vec!["missing:coherence"]);
    assert_eq!(out.state, SafetyState::Barrier);
}

#[test]
fn soft_rate_limit_throttles() {
    let mut c = controller();
    let frame = sanitize(&with(json!({ "rate_change": 0.6, "desired_u": 0.9 })));
    let (verdict, out) = c.step(&frame);
    assert_eq!(verdict.state, SafetyState::Throttle);
    assert!(verdict.allow_control);
    assert_eq!(out.state, SafetyState::Throttle);
    assert_eq!(out.u_cmd, verdict.limits.power_budget_soft);
    assert!(out.gain < 1.0);
    assert!(out.coupling < 1.0);
    assert_eq!(c.evaluator().latch().violation_streak(), 0);
}

#[test]
fn all_firing_guards_are_reported() {
    let mut c = controller();
    let frame = sanitize(&json!({
        "power_draw": 2.0,
        "coherence": 0.2,
        "phase_error": -0.9,
        "rate_change": 0.7,
    }));
    let (verdict, _) = c.step(&frame);
    assert_eq!(verdict.state, SafetyState::Barrier);
    assert_eq!(
        verdict.reasons,
        vec![
            "power_overflow:power_draw>1",
            "coherence_collapse:coherence<=0.5",
            "phase_runaway:|phase_error|>0.5",
            "rate_limit:|rate_change|>0.5",
        ]
    );
}

#[test]
fn emergency_stop_halts_immediately() {
    let mut c = controller();
    let out = c.tick_value(&with(json!({ "emergency_stop": "yes", "desired_u": 1.0 })));
    assert_eq!(out.state, SafetyState::SafeHalt);
    assert_eq!(out.u_cmd, 0.0);
    assert!(c.evaluator().latch().is_latched());
}

#[test]
fn empty_observation_is_handled() {
    let mut c = controller();
    let out = c.tick_value(&json!({}));
    assert_eq!(out.state, SafetyState::Barrier);
    assert!(out.is_finite());
}

#[test]
fn identical_histories_give_identical_outputs() {
    let inputs = [
        with(json!({ "desired_u": 0.4 })),
        with(json!({ "rate_change": 0.8 })),
        with(json!({ "coherence": 0.3 })),
        with(json!({ "desired_u": 0.7 })),
    ];
    let mut a = controller();
    let mut b = controller();
    for raw in &inputs {
        assert_eq!(a.tick_value(raw), b.tick_value(raw));
    }
}

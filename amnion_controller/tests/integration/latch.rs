//! Streak counting, latch idempotence and manual reset.

use amnion_common::controller::config::AmnionConfig;
use amnion_common::controller::state::SafetyState;
use amnion_controller::cycle::Controller;
use amnion_controller::metrics::NullSink;
use serde_json::json;

use super::{controller, nominal, sanitize, with};

#[test]
fn normal_tick_resets_streak() {
    let mut c = controller();
    let bad = with(json!({ "phase_error": 0.9 }));
    c.tick_value(&bad);
    c.tick_value(&bad);
    assert_eq!(c.evaluator().latch().violation_streak(), 2);

    assert_eq!(c.tick_value(&nominal()).state, SafetyState::Normal);
    assert_eq!(c.evaluator().latch().violation_streak(), 0);

    c.tick_value(&bad);
    c.tick_value(&bad);
    assert_eq!(c.tick_value(&nominal()).state, SafetyState::Normal);
    assert!(!c.evaluator().latch().is_latched());
}

#[test]
fn soft_tick_neither_resets_nor_advances_streak() {
    let mut c = controller();
    let hard = with(json!({ "phase_error": 0.9 }));
    let soft = with(json!({ "rate_change": 0.7 }));

    c.tick_value(&hard);
    c.tick_value(&hard);
    assert_eq!(c.tick_value(&soft).state, SafetyState::Throttle);
    assert_eq!(c.evaluator().latch().violation_streak(), 2);

    let out = c.tick_value(&hard);
    assert_eq!(out.state, SafetyState::SafeHalt);
    assert!(c.evaluator().latch().is_latched());
}

#[test]
fn exactly_n_hard_ticks_required() {
    let mut cfg = AmnionConfig::default();
    cfg.escalation.safe_halt_after = 5;
    let mut c = Controller::new(&cfg, NullSink).unwrap();
    let bad = json!({});
    for _ in 0..4 {
        assert_eq!(c.tick_value(&bad).state, SafetyState::Barrier);
    }
    let (verdict, _) = c.step(&Default::default());
    assert_eq!(verdict.state, SafetyState::SafeHalt);
    assert!(verdict.has_reason("repeated_violations>=5"));
}

#[test]
fn latch_holds_for_any_input() {
    let mut c = controller();
    c.tick_value(&with(json!({ "emergency_stop": true })));
    for raw in [
        nominal(),
        json!({}),
        with(json!({ "rate_change": 0.7 })),
        json!(null),
    ] {
        let (verdict, out) = c.step(&sanitize(&raw));
        assert_eq!(verdict.reasons, vec!["latched_safe_halt"]);
        assert_eq!(out.state, SafetyState::SafeHalt);
        assert_eq!(out.u_cmd, 0.0);
    }
}

#[test]
fn reset_then_clean_input_is_normal() {
    let mut c = controller();
    let bad = with(json!({ "power_draw": 3.0 }));
    for _ in 0..3 {
        c.tick_value(&bad);
    }
    assert!(c.evaluator().latch().is_latched());

    c.manual_reset();
    assert!(!c.evaluator().latch().is_latched());
    assert_eq!(c.evaluator().latch().violation_streak(), 0);

    let out = c.tick_value(&with(json!({ "desired_u": 0.2 })));
    assert_eq!(out.state, SafetyState::Normal);
    assert_eq!(out.u_cmd, 0.2);
}

#[test]
fn reset_does_not_mask_new_emergency_stop() {
    let mut c = controller();
    c.tick_value(&with(json!({ "emergency_stop": 1 })));
    c.manual_reset();
    let out = c.tick_value(&with(json!({ "emergency_stop": true })));
    assert_eq!(out.state, SafetyState::SafeHalt);
}

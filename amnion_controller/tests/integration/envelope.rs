//! Property tests: the command never leaves the envelope or the budget.

use amnion_common::controller::config::AmnionConfig;
use amnion_common::controller::limits::SafetyLimits;
use amnion_common::controller::sensor::SensorFrame;
use amnion_common::controller::state::SafetyState;
use amnion_controller::cycle::Controller;
use amnion_controller::metrics::NullSink;
use proptest::prelude::*;

fn opt_value() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        8 => (-5.0f64..5.0).prop_map(Some),
    ]
}

fn frame() -> impl Strategy<Value = SensorFrame> {
    (
        opt_value(),
        opt_value(),
        opt_value(),
        opt_value(),
        opt_value(),
        any::<bool>(),
        opt_value(),
        opt_value(),
    )
        .prop_map(
            |(power_in, power_draw, coherence, phase_error, rate_change, estop, desired_u, gain)| {
                SensorFrame {
                    power_in,
                    power_draw,
                    coherence: coherence.map(|q| q.clamp(0.0, 1.0)),
                    phase_error,
                    rate_change,
                    // Keep e-stop rare so the other states stay reachable.
                    emergency_stop: estop && power_in.is_some_and(|p| p > 4.5),
                    desired_u,
                    gain,
                    ..Default::default()
                }
            },
        )
}

/// Least state the frame alone calls for, worked out from the limits
/// directly.
fn guard_floor(f: &SensorFrame, limits: &SafetyLimits) -> SafetyState {
    if f.emergency_stop {
        return SafetyState::SafeHalt;
    }
    let required = [f.power_draw, f.coherence, f.phase_error, f.rate_change];
    let invalid = required.iter().any(|v| !v.is_some_and(f64::is_finite))
        || f.power_in.is_some_and(|p| !p.is_finite())
        || f.coherence.is_some_and(|q| !(0.0..=1.0).contains(&q))
        || f.power_draw.is_some_and(|p| p < 0.0);
    let hard = invalid
        || f.power_draw.is_some_and(|p| p > limits.power_max)
        || f.coherence.is_some_and(|q| q <= limits.coherence_crit)
        || f.phase_error.is_some_and(|e| e.abs() > limits.phase_trip)
        || f.rate_change.is_some_and(|r| r.abs() > limits.rate_trip);
    if hard {
        SafetyState::Barrier
    } else if f.rate_change.is_some_and(|r| r.abs() > limits.rate_limit) {
        SafetyState::Throttle
    } else {
        SafetyState::Normal
    }
}

proptest! {
    #[test]
    fn command_stays_inside_envelope_and_budget(frames in prop::collection::vec(frame(), 1..20)) {
        let cfg = AmnionConfig::default();
        let mut c = Controller::new(&cfg, NullSink).unwrap();
        for f in &frames {
            let (verdict, out) = c.step(f);
            prop_assert!(out.is_finite());
            prop_assert!(cfg.control.u_min <= out.u_cmd && out.u_cmd <= cfg.control.u_max);
            prop_assert!(out.u_cmd <= cfg.safety.power_max.min(out.power_budget));
            prop_assert!(out.state >= verdict.state);
            if verdict.state == SafetyState::SafeHalt {
                prop_assert_eq!(out.u_cmd, cfg.control.u_safe_halt);
            }
            if !verdict.allow_control {
                prop_assert!(out.state >= SafetyState::Barrier);
            }
        }
    }

    #[test]
    fn first_tick_state_matches_limits(f in frame()) {
        let cfg = AmnionConfig::default();
        let mut c = Controller::new(&cfg, NullSink).unwrap();
        let (verdict, out) = c.step(&f);
        // One tick cannot fill the streak, so the frame alone decides.
        prop_assert_eq!(verdict.state, guard_floor(&f, &cfg.safety));
        prop_assert_eq!(out.state, verdict.state);
        prop_assert_eq!(verdict.allow_control, verdict.state.allows_control());
    }

    #[test]
    fn state_never_below_limits(frames in prop::collection::vec(frame(), 1..20)) {
        let cfg = AmnionConfig::default();
        let mut c = Controller::new(&cfg, NullSink).unwrap();
        for f in &frames {
            let (verdict, _) = c.step(f);
            prop_assert!(verdict.state >= guard_floor(f, &cfg.safety));
        }
    }

    #[test]
    fn latched_controller_stays_halted(frames in prop::collection::vec(frame(), 1..10)) {
        let mut c = Controller::new(&AmnionConfig::default(), NullSink).unwrap();
        c.step(&SensorFrame { emergency_stop: true, ..Default::default() });
        for f in &frames {
            let (verdict, out) = c.step(f);
            prop_assert_eq!(verdict.state, SafetyState::SafeHalt);
            prop_assert_eq!(out.u_cmd, 0.0);
        }
    }
}

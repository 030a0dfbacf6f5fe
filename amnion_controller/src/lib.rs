//! # AMNION Controller Library
//!
//! Deterministic single-loop safety interlock. Every tick runs four
//! stages in order and always produces a bounded actuator command:
//!
//! 1. **Sanitize**: raw key/value observation → typed [`SensorFrame`]
//! 2. **Evaluate**: guards → [`SafetyVerdict`] (latching, streak-counted)
//! 3. **Control**: verdict + patch → clamped [`ControlFrame`]
//! 4. **Report**: best-effort hand-off to a [`MetricsSink`]
//!
//! ## Escalation
//!
//! `NORMAL < THROTTLE < BARRIER < SAFE_HALT`. The most severe triggered
//! guard wins. SAFE_HALT latches; only [`Controller::manual_reset`] clears
//! it.
//!
//! ```
//! use amnion_common::prelude::*;
//! use amnion_controller::cycle::Controller;
//! use amnion_controller::metrics::NullSink;
//! use serde_json::json;
//!
//! let mut controller = Controller::new(&AmnionConfig::default(), NullSink).unwrap();
//! let out = controller.tick_value(&json!({
//!     "power_draw": 0.5, "coherence": 0.9, "phase_error": 0.1,
//!     "rate_change": 0.05, "desired_u": 0.3,
//! }));
//! assert_eq!(out.state, SafetyState::Normal);
//! assert_eq!(out.u_cmd, 0.3);
//! ```
//!
//! [`SensorFrame`]: amnion_common::controller::sensor::SensorFrame
//! [`SafetyVerdict`]: amnion_common::controller::verdict::SafetyVerdict
//! [`ControlFrame`]: amnion_common::controller::control::ControlFrame
//! [`MetricsSink`]: metrics::MetricsSink
//! [`Controller::manual_reset`]: cycle::Controller::manual_reset

pub mod config;
pub mod control;
pub mod cycle;
pub mod metrics;
pub mod safety;
pub mod sanitize;
pub mod stream;

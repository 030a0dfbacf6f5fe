//! Sensor sanitizer: raw observation → typed [`SensorFrame`].
//!
//! Total and side-effect free. Unrecognized keys are ignored, unparseable
//! or non-finite numbers become `None` (never zero), `coherence` is clamped
//! into `[0, 1]`, and aliases fill a field only when its canonical key is
//! absent.

use amnion_common::controller::sensor::{SensorField, SensorFrame};
use serde_json::{Map, Value};

/// One raw observation: a flat key/value mapping.
pub type RawSensors = Map<String, Value>;

/// Coherence domain.
const COHERENCE_MIN: f64 = 0.0;
const COHERENCE_MAX: f64 = 1.0;

/// Normalizes raw observations into sanitized frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSanitizer;

impl SensorSanitizer {
    pub const fn new() -> Self {
        Self
    }

    /// Sanitize one observation. Never fails.
    pub fn sanitize(&self, raw: &RawSensors) -> SensorFrame {
        let mut frame = SensorFrame::default();

        for field in SensorField::ALL {
            *frame.slot_mut(field) = number(raw, field.key(), field.aliases());
        }
        if let Some(q) = frame.coherence {
            frame.coherence = Some(q.clamp(COHERENCE_MIN, COHERENCE_MAX));
        }

        frame.desired_u = number(raw, "desired_u", &[]);
        frame.power_draw_request = number(raw, "power_draw_request", &["P_draw_request"]);
        frame.gain = number(raw, "G", &["gain"]);
        frame.coupling = number(raw, "K", &["coupling"]);
        frame.damping = number(raw, "D", &["damping"]);

        frame.emergency_stop = raw.get("emergency_stop").is_some_and(to_bool);
        frame.tick = raw.get("tick").and_then(to_tick);
        frame
    }

    /// Sanitize any JSON value; non-objects yield an empty frame.
    pub fn sanitize_value(&self, raw: &Value) -> SensorFrame {
        match raw {
            Value::Object(map) => self.sanitize(map),
            _ => SensorFrame::default(),
        }
    }
}

/// Canonical key first; aliases only when the canonical key is absent.
/// `null` counts as absent.
fn lookup<'a>(raw: &'a RawSensors, key: &str, aliases: &[&str]) -> Option<&'a Value> {
    let present = |k: &str| raw.get(k).filter(|v| !v.is_null());
    present(key).or_else(|| aliases.iter().find_map(|alias| present(*alias)))
}

fn number(raw: &RawSensors, key: &str, aliases: &[&str]) -> Option<f64> {
    lookup(raw, key, aliases).and_then(to_f64)
}

/// Coerce to a finite float.
pub fn to_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    v.filter(|x| x.is_finite())
}

/// Coerce to a boolean.
///
/// Unknown strings count as asserted: an emergency-stop line that cannot
/// be read is treated as pressed.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            !matches!(s.as_str(), "" | "false" | "0" | "no" | "off")
        }
        Value::Null => false,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Coerce to a non-negative tick index.
fn to_tick(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|x| x.is_finite() && *x >= 0.0 && *x < u64::MAX as f64)
                .map(|x| x as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

//! Shared helpers for the integration suite.

mod config;
mod envelope;
mod latch;
mod metrics;
mod scenarios;
mod stream;

use amnion_common::controller::config::AmnionConfig;
use amnion_common::controller::sensor::SensorFrame;
use amnion_controller::cycle::Controller;
use amnion_controller::metrics::{Metrics, NullSink};
use amnion_controller::sanitize::SensorSanitizer;
use serde_json::{Value, json};

/// Observation with every required field nominal.
pub fn nominal() -> Value {
    json!({
        "power_draw": 0.5,
        "coherence": 0.9,
        "phase_error": 0.1,
        "rate_change": 0.05,
    })
}

/// `nominal()` with `overrides` merged in.
pub fn with(overrides: Value) -> Value {
    let mut base = nominal();
    if let (Some(b), Some(o)) = (base.as_object_mut(), overrides.as_object()) {
        for (k, v) in o {
            b.insert(k.clone(), v.clone());
        }
    }
    base
}

/// `nominal()` without `key`.
pub fn without(key: &str) -> Value {
    let mut base = nominal();
    if let Some(b) = base.as_object_mut() {
        b.remove(key);
    }
    base
}

pub fn controller() -> Controller<NullSink> {
    Controller::new(&AmnionConfig::default(), NullSink).unwrap()
}

pub fn metered_controller() -> Controller<Metrics> {
    Controller::new(&AmnionConfig::default(), Metrics::default()).unwrap()
}

pub fn sanitize(raw: &Value) -> SensorFrame {
    SensorSanitizer::new().sanitize_value(raw)
}

//! Per-tick orchestration: sanitize → evaluate → control → metrics.
//!
//! One tick runs to completion before the next begins. The controller owns
//! its evaluator (and therefore its latch); independent actuators each get
//! their own [`Controller`].

use amnion_common::config::ConfigError;
use amnion_common::controller::config::AmnionConfig;
use amnion_common::controller::control::ControlFrame;
use amnion_common::controller::sensor::SensorFrame;
use amnion_common::controller::state::SafetyState;
use amnion_common::controller::verdict::SafetyVerdict;
use serde_json::Value;
use tracing::{debug, warn};

use crate::control::ControlLawEngine;
use crate::metrics::MetricsSink;
use crate::safety::SafetyEvaluator;
use crate::sanitize::{RawSensors, SensorSanitizer};

// ─── Tick Statistics ────────────────────────────────────────────────

/// O(1) per-tick counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Ticks executed.
    pub ticks: u64,
    /// Ticks whose verdict was not NORMAL.
    pub violations: u64,
    /// Ticks that ended in SAFE_HALT.
    pub safe_halt_ticks: u64,
    /// Metrics sink errors swallowed.
    pub metrics_failures: u64,
}

impl TickStats {
    fn update(&mut self, state: SafetyState) {
        self.ticks += 1;
        if state != SafetyState::Normal {
            self.violations += 1;
        }
        if state == SafetyState::SafeHalt {
            self.safe_halt_ticks += 1;
        }
    }
}

// ─── Controller ─────────────────────────────────────────────────────

/// Single-loop safety interlock.
#[derive(Debug)]
pub struct Controller<M: MetricsSink> {
    sanitizer: SensorSanitizer,
    evaluator: SafetyEvaluator,
    engine: ControlLawEngine,
    metrics: M,
    stats: TickStats,
}

impl<M: MetricsSink> Controller<M> {
    /// Build a controller from a configuration. Fails if any section is
    /// invalid; no tick can run on unvalidated limits.
    pub fn new(config: &AmnionConfig, metrics: M) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sanitizer: SensorSanitizer::new(),
            evaluator: SafetyEvaluator::new(config.safety, config.escalation),
            engine: ControlLawEngine::new(config.control)?,
            metrics,
            stats: TickStats::default(),
        })
    }

    /// Run one tick on a raw observation. Never fails.
    pub fn tick(&mut self, raw: &RawSensors) -> ControlFrame {
        let frame = self.sanitizer.sanitize(raw);
        self.step(&frame).1
    }

    /// [`tick`](Self::tick) for any JSON value; non-objects are an empty
    /// observation.
    pub fn tick_value(&mut self, raw: &Value) -> ControlFrame {
        let frame = self.sanitizer.sanitize_value(raw);
        self.step(&frame).1
    }

    /// Evaluate and compute on an already sanitized frame.
    pub fn step(&mut self, frame: &SensorFrame) -> (SafetyVerdict, ControlFrame) {
        let verdict = self.evaluator.evaluate(frame);
        let control = self.engine.compute(frame, &verdict);
        self.stats.update(control.state);
        debug!(
            tick = self.stats.ticks,
            state = %control.state,
            u_cmd = control.u_cmd,
            "Tick complete"
        );

        if let Err(e) = self.metrics.record(frame, &verdict, &control) {
            self.stats.metrics_failures += 1;
            if self.stats.metrics_failures == 1 {
                warn!("Metrics sink failed, further failures logged at debug: {e}");
            } else {
                debug!(failures = self.stats.metrics_failures, "Metrics sink failed: {e}");
            }
        }

        (verdict, control)
    }

    /// Operator reset of the SAFE_HALT latch.
    pub fn manual_reset(&mut self) {
        self.evaluator.manual_reset();
    }

    #[inline]
    pub const fn evaluator(&self) -> &SafetyEvaluator {
        &self.evaluator
    }

    #[inline]
    pub const fn engine(&self) -> &ControlLawEngine {
        &self.engine
    }

    #[inline]
    pub const fn stats(&self) -> &TickStats {
        &self.stats
    }

    #[inline]
    pub const fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Consume the controller and hand back its metrics sink.
    pub fn into_metrics(self) -> M {
        self.metrics
    }
}

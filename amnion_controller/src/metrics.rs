//! Metrics root.
//!
//! The orchestrator reports every tick to a [`MetricsSink`]. Sink errors
//! never reach the control path; the orchestrator counts and drops them.

pub mod channel;
pub mod collector;

use amnion_common::controller::control::ControlFrame;
use amnion_common::controller::sensor::SensorFrame;
use amnion_common::controller::state::SafetyState;
use amnion_common::controller::verdict::SafetyVerdict;
use serde::Serialize;
use thiserror::Error;

pub use channel::{ChannelSink, spawn_collector};
pub use collector::{Metrics, MetricsSnapshot, TickSummary};

/// Metrics sink failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("metrics channel full, record dropped")]
    ChannelFull,
    #[error("metrics collector disconnected")]
    Disconnected,
    #[error("metrics sink failed: {0}")]
    Sink(String),
}

/// Per-tick metrics collaborator.
pub trait MetricsSink {
    fn record(
        &mut self,
        sensors: &SensorFrame,
        verdict: &SafetyVerdict,
        control: &ControlFrame,
    ) -> Result<(), MetricsError>;
}

impl<S: MetricsSink + ?Sized> MetricsSink for Box<S> {
    fn record(
        &mut self,
        sensors: &SensorFrame,
        verdict: &SafetyVerdict,
        control: &ControlFrame,
    ) -> Result<(), MetricsError> {
        (**self).record(sensors, verdict, control)
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn record(&mut self, _: &SensorFrame, _: &SafetyVerdict, _: &ControlFrame) -> Result<(), MetricsError> {
        Ok(())
    }
}

/// Owned, serializable summary of one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRecord {
    /// Tick index carried by the input frame, if any.
    pub frame_tick: Option<u64>,
    pub state: SafetyState,
    pub allow_control: bool,
    pub reasons: Vec<String>,
    pub power_in: Option<f64>,
    pub power_draw: Option<f64>,
    pub coherence: Option<f64>,
    pub phase_error: Option<f64>,
    pub u_cmd: f64,
    pub power_budget: f64,
    pub notes: Vec<String>,
}

impl TickRecord {
    pub fn new(sensors: &SensorFrame, verdict: &SafetyVerdict, control: &ControlFrame) -> Self {
        Self {
            frame_tick: sensors.tick,
            state: verdict.state,
            allow_control: verdict.allow_control,
            reasons: verdict.reasons.clone(),
            power_in: sensors.power_in,
            power_draw: sensors.power_draw,
            coherence: sensors.coherence,
            phase_error: sensors.phase_error,
            u_cmd: control.u_cmd,
            power_budget: control.power_budget,
            notes: control.notes.iter().map(|n| (*n).to_string()).collect(),
        }
    }

    /// Any non-NORMAL verdict counts as a violation.
    #[inline]
    pub fn is_violation(&self) -> bool {
        self.state != SafetyState::Normal
    }
}

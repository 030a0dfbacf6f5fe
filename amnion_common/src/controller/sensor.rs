//! Sanitized sensor frame.
//!
//! Every numeric field is either a finite `f64` or `None`. The sanitizer in
//! `amnion_controller` is the only producer of frames from raw input; tests
//! and benches may build frames directly.

use serde::{Deserialize, Serialize};

/// Fields the evaluator requires to be present on every tick.
pub const REQUIRED_FIELDS: [SensorField; 4] = [
    SensorField::PowerDraw,
    SensorField::Coherence,
    SensorField::PhaseError,
    SensorField::RateChange,
];

/// Numeric observation fields checked by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorField {
    PowerIn,
    PowerDraw,
    Coherence,
    PhaseError,
    RateChange,
}

impl SensorField {
    /// All observation fields, in canonical order.
    pub const ALL: [SensorField; 5] = [
        Self::PowerIn,
        Self::PowerDraw,
        Self::Coherence,
        Self::PhaseError,
        Self::RateChange,
    ];

    /// Canonical key in the raw observation.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::PowerIn => "power_in",
            Self::PowerDraw => "power_draw",
            Self::Coherence => "coherence",
            Self::PhaseError => "phase_error",
            Self::RateChange => "rate_change",
        }
    }

    /// Alternate spellings accepted when the canonical key is absent.
    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::PowerIn => &["P_in"],
            Self::PowerDraw => &["P_draw"],
            Self::Coherence => &["Q"],
            Self::PhaseError | Self::RateChange => &[],
        }
    }
}

/// Sanitized observation for one control tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorFrame {
    /// Input power.
    pub power_in: Option<f64>,
    /// Power drawn by the actuator.
    pub power_draw: Option<f64>,
    /// Signal-quality proxy in [0, 1].
    pub coherence: Option<f64>,
    /// Phase alignment error [rad].
    pub phase_error: Option<f64>,
    /// Rate of change of the controlled quantity [units/tick].
    pub rate_change: Option<f64>,
    /// Operator or hardware emergency stop.
    pub emergency_stop: bool,
    /// Tick index supplied by the scheduler.
    pub tick: Option<u64>,

    /// Requested actuation.
    pub desired_u: Option<f64>,
    /// Secondary actuation request, used when `desired_u` is absent.
    pub power_draw_request: Option<f64>,
    /// Frame-provided gain.
    pub gain: Option<f64>,
    /// Frame-provided coupling.
    pub coupling: Option<f64>,
    /// Frame-provided damping.
    pub damping: Option<f64>,
}

impl SensorFrame {
    /// Value of an observation field.
    #[inline]
    pub fn get(&self, field: SensorField) -> Option<f64> {
        match field {
            SensorField::PowerIn => self.power_in,
            SensorField::PowerDraw => self.power_draw,
            SensorField::Coherence => self.coherence,
            SensorField::PhaseError => self.phase_error,
            SensorField::RateChange => self.rate_change,
        }
    }

    /// Mutable slot of an observation field.
    #[inline]
    pub fn slot_mut(&mut self, field: SensorField) -> &mut Option<f64> {
        match field {
            SensorField::PowerIn => &mut self.power_in,
            SensorField::PowerDraw => &mut self.power_draw,
            SensorField::Coherence => &mut self.coherence,
            SensorField::PhaseError => &mut self.phase_error,
            SensorField::RateChange => &mut self.rate_change,
        }
    }

    /// `field` if present and finite.
    #[inline]
    pub fn finite(&self, field: SensorField) -> Option<f64> {
        self.get(field).filter(|v| v.is_finite())
    }

    /// Requested actuation: `desired_u`, then `power_draw_request`, then 0.
    #[inline]
    pub fn requested_u(&self) -> f64 {
        self.desired_u
            .filter(|v| v.is_finite())
            .or(self.power_draw_request.filter(|v| v.is_finite()))
            .unwrap_or(0.0)
    }

    /// Nominal frame: every required field present and inside the default
    /// envelope.
    pub fn nominal() -> Self {
        Self {
            power_draw: Some(0.5),
            coherence: Some(0.9),
            phase_error: Some(0.1),
            rate_change: Some(0.05),
            ..Default::default()
        }
    }
}

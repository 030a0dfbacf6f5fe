//! Control-law parameters and the per-tick control output.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{
    COUPLING_DEFAULT, DAMPING_DEFAULT, DAMPING_HIGH, GAIN_DEFAULT, MAX_NOTES, U_MAX, U_MIN,
    U_SAFE_HALT,
};

use super::state::SafetyState;

/// Control-law configuration.
///
/// # TOML Example
///
/// ```toml
/// [control]
/// u_min = 0.0
/// u_max = 1.0
/// damping_high = 1.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlLawConfig {
    /// Lower actuator bound.
    pub u_min: f64,
    /// Upper actuator bound.
    pub u_max: f64,
    /// Gain when the frame does not provide one.
    pub gain_default: f64,
    /// Coupling when the frame does not provide one.
    pub coupling_default: f64,
    /// Damping when the frame does not provide one; also the "LOW" level.
    pub damping_default: f64,
    /// Numeric value of the "HIGH" damping level.
    pub damping_high: f64,
    /// Command issued in SAFE_HALT.
    pub u_safe_halt: f64,
}

impl Default for ControlLawConfig {
    fn default() -> Self {
        Self {
            u_min: U_MIN,
            u_max: U_MAX,
            gain_default: GAIN_DEFAULT,
            coupling_default: COUPLING_DEFAULT,
            damping_default: DAMPING_DEFAULT,
            damping_high: DAMPING_HIGH,
            u_safe_halt: U_SAFE_HALT,
        }
    }
}

impl ControlLawConfig {
    /// Validate the envelope.
    ///
    /// The envelope must contain 0 so that a zero power budget is always
    /// reachable, and the halt command must sit in `[u_min, 0]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("u_min", self.u_min),
            ("u_max", self.u_max),
            ("gain_default", self.gain_default),
            ("coupling_default", self.coupling_default),
            ("damping_default", self.damping_default),
            ("damping_high", self.damping_high),
            ("u_safe_halt", self.u_safe_halt),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if !(self.u_min <= 0.0 && 0.0 <= self.u_max && self.u_min < self.u_max) {
            return Err(ConfigError::ValidationError(format!(
                "actuator envelope [{}, {}] must contain 0",
                self.u_min, self.u_max
            )));
        }
        if !(self.u_min <= self.u_safe_halt && self.u_safe_halt <= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "u_safe_halt {} out of range [{}, 0]",
                self.u_safe_halt, self.u_min
            )));
        }
        if self.damping_default < 0.0 || self.damping_high < 0.0 {
            return Err(ConfigError::ValidationError(
                "damping values must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Bounded actuator command for one tick.
///
/// Every field is populated on every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlFrame {
    /// Mirrors the verdict state (or the stricter effective mode).
    pub state: SafetyState,
    /// Actuator command, inside the envelope and the power budget.
    pub u_cmd: f64,
    /// Gain.
    #[serde(rename = "G")]
    pub gain: f64,
    /// Coupling.
    #[serde(rename = "K")]
    pub coupling: f64,
    /// Damping.
    #[serde(rename = "D")]
    pub damping: f64,
    /// Effective power budget.
    pub power_budget: f64,
    /// Short annotations (mode, frozen adaptation, ...).
    pub notes: Vec<&'static str, MAX_NOTES>,
}

impl ControlFrame {
    /// Returns true if all numeric fields are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.u_cmd.is_finite()
            && self.gain.is_finite()
            && self.coupling.is_finite()
            && self.damping.is_finite()
            && self.power_budget.is_finite()
    }

    /// Whether `note` was attached.
    pub fn has_note(&self, note: &str) -> bool {
        self.notes.iter().any(|n| *n == note)
    }
}

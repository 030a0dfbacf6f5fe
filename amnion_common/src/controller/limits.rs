//! Safety limits and escalation policy.
//!
//! `SafetyLimits` is loaded once and never mutated afterwards. It is `Copy`
//! so every verdict can echo it to the control law by value.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{
    COHERENCE_CRIT, PHASE_TRIP, POWER_BUDGET_MIN, POWER_BUDGET_SOFT, POWER_MAX, RATE_LIMIT,
    RATE_TRIP, SAFE_HALT_AFTER, THROTTLE_COUPLING_SCALE, THROTTLE_COUPLING_SCALE_MAX,
    THROTTLE_COUPLING_SCALE_MIN, THROTTLE_DAMPING_BOOST, THROTTLE_DAMPING_BOOST_MAX,
    THROTTLE_DAMPING_BOOST_MIN, THROTTLE_GAIN_SCALE, THROTTLE_GAIN_SCALE_MAX,
    THROTTLE_GAIN_SCALE_MIN,
};

/// Safety envelope thresholds.
///
/// # TOML Example
///
/// ```toml
/// [safety]
/// power_max = 1.0
/// coherence_crit = 0.5
/// rate_limit = 0.5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyLimits {
    /// Hard power limit; also the NORMAL-mode power budget.
    pub power_max: f64,
    /// Power budget in BARRIER.
    pub power_budget_min: f64,
    /// Power budget in THROTTLE.
    pub power_budget_soft: f64,
    /// Coherence collapse threshold (inclusive).
    pub coherence_crit: f64,
    /// Phase runaway threshold on `|phase_error|`.
    pub phase_trip: f64,
    /// Hard rate-of-change trip on `|rate_change|`.
    pub rate_trip: f64,
    /// Soft rate-of-change limit on `|rate_change|`.
    pub rate_limit: f64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            power_max: POWER_MAX,
            power_budget_min: POWER_BUDGET_MIN,
            power_budget_soft: POWER_BUDGET_SOFT,
            coherence_crit: COHERENCE_CRIT,
            phase_trip: PHASE_TRIP,
            rate_trip: RATE_TRIP,
            rate_limit: RATE_LIMIT,
        }
    }
}

impl SafetyLimits {
    /// Validate threshold consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("power_max", self.power_max),
            ("phase_trip", self.phase_trip),
            ("rate_trip", self.rate_trip),
            ("rate_limit", self.rate_limit),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{name} must be finite and > 0, got {value}")));
            }
        }
        if !self.power_budget_min.is_finite() || self.power_budget_min < 0.0 {
            return Err(invalid(format!(
                "power_budget_min must be finite and >= 0, got {}",
                self.power_budget_min
            )));
        }
        if !(self.power_budget_min <= self.power_budget_soft
            && self.power_budget_soft <= self.power_max)
        {
            return Err(invalid(format!(
                "expected power_budget_min <= power_budget_soft <= power_max, got {} / {} / {}",
                self.power_budget_min, self.power_budget_soft, self.power_max
            )));
        }
        if !(0.0..1.0).contains(&self.coherence_crit) {
            return Err(invalid(format!(
                "coherence_crit {} out of range [0, 1)",
                self.coherence_crit
            )));
        }
        if self.rate_limit >= self.rate_trip {
            return Err(invalid(format!(
                "rate_limit {} must be below rate_trip {}",
                self.rate_limit, self.rate_trip
            )));
        }
        Ok(())
    }
}

/// Escalation policy: streak threshold and THROTTLE patch factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Consecutive hard-violation ticks before SAFE_HALT latches.
    pub safe_halt_after: u32,
    /// THROTTLE gain scale, within [0.5, 0.7].
    pub throttle_gain_scale: f64,
    /// THROTTLE coupling scale, within [0.5, 0.7].
    pub throttle_coupling_scale: f64,
    /// THROTTLE damping boost, within [1.3, 2.0].
    pub throttle_damping_boost: f64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            safe_halt_after: SAFE_HALT_AFTER,
            throttle_gain_scale: THROTTLE_GAIN_SCALE,
            throttle_coupling_scale: THROTTLE_COUPLING_SCALE,
            throttle_damping_boost: THROTTLE_DAMPING_BOOST,
        }
    }
}

impl EscalationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.safe_halt_after == 0 {
            return Err(invalid("safe_halt_after must be >= 1".to_string()));
        }
        check_range(
            "throttle_gain_scale",
            self.throttle_gain_scale,
            THROTTLE_GAIN_SCALE_MIN,
            THROTTLE_GAIN_SCALE_MAX,
        )?;
        check_range(
            "throttle_coupling_scale",
            self.throttle_coupling_scale,
            THROTTLE_COUPLING_SCALE_MIN,
            THROTTLE_COUPLING_SCALE_MAX,
        )?;
        check_range(
            "throttle_damping_boost",
            self.throttle_damping_boost,
            THROTTLE_DAMPING_BOOST_MIN,
            THROTTLE_DAMPING_BOOST_MAX,
        )
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(invalid(format!("{name} {value} out of range [{min}, {max}]")));
    }
    Ok(())
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::ValidationError(msg)
}

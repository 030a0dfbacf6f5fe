//! Corrective patch prescribed by the safety evaluator.
//!
//! One variant per mode, each carrying only the fields that mode uses, so
//! an impossible combination (e.g. a scaled gain in SAFE_HALT) cannot be
//! expressed.

use serde::{Deserialize, Serialize};

use super::limits::{EscalationConfig, SafetyLimits};
use super::state::PatchMode;

/// Damping request: symbolic level or raw value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Damping {
    /// Configured high-damping constant.
    High,
    /// Configured default damping.
    Low,
    /// Raw numeric damping, used as-is.
    Value(f64),
}

/// Mode-specific modification applied by the control law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Patch {
    /// NORMAL: parameters pass through.
    #[default]
    None,
    /// Scale gain and coupling down, boost damping, cap at the soft budget.
    Throttle {
        gain_scale: f64,
        coupling_scale: f64,
        damping_boost: f64,
        power_budget: f64,
    },
    /// Decouple, damp, cap at the minimal budget.
    Barrier {
        damping: Damping,
        power_budget: f64,
        freeze_fast_adaptation: bool,
    },
    /// Decouple, damp, no actuation.
    SafeHalt { damping: Damping },
}

impl Patch {
    /// THROTTLE patch from the escalation policy and limits.
    pub fn throttle(escalation: &EscalationConfig, limits: &SafetyLimits) -> Self {
        Self::Throttle {
            gain_scale: escalation.throttle_gain_scale,
            coupling_scale: escalation.throttle_coupling_scale,
            damping_boost: escalation.throttle_damping_boost,
            power_budget: limits.power_budget_soft,
        }
    }

    /// BARRIER patch from the limits.
    pub fn barrier(limits: &SafetyLimits) -> Self {
        Self::Barrier {
            damping: Damping::High,
            power_budget: limits.power_budget_min,
            freeze_fast_adaptation: true,
        }
    }

    /// SAFE_HALT patch.
    pub const fn safe_halt() -> Self {
        Self::SafeHalt {
            damping: Damping::High,
        }
    }

    /// Mode tag of this patch.
    #[inline]
    pub const fn mode(&self) -> PatchMode {
        match self {
            Self::None => PatchMode::None,
            Self::Throttle { .. } => PatchMode::Throttle,
            Self::Barrier { .. } => PatchMode::Barrier,
            Self::SafeHalt { .. } => PatchMode::SafeHalt,
        }
    }
}

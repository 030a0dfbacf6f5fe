//! Safety state and patch mode enums.
//!
//! Both enums are totally ordered by severity so escalation can be written
//! as `max`. `#[repr(u8)]` keeps them compact for logging and transport.

use serde::{Deserialize, Serialize};

/// Safety state of one control tick.
///
/// Order is the escalation order: `Normal < Throttle < Barrier < SafeHalt`.
/// Control is allowed only in `Normal` and `Throttle`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum SafetyState {
    /// All guards clear.
    #[default]
    Normal = 0,
    /// Soft limit exceeded: reduced gain and power.
    Throttle = 1,
    /// Hard violation: decoupled, damped, minimal power.
    Barrier = 2,
    /// Actuation disabled until manual reset.
    SafeHalt = 3,
}

impl SafetyState {
    /// Whether the control law may follow the requested actuation.
    #[inline]
    pub const fn allows_control(&self) -> bool {
        matches!(self, Self::Normal | Self::Throttle)
    }

    /// Escalate: the more severe of `self` and `other`.
    #[inline]
    pub fn escalate(self, other: Self) -> Self {
        self.max(other)
    }

    /// Upper-case name used in logs and reasons.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Throttle => "THROTTLE",
            Self::Barrier => "BARRIER",
            Self::SafeHalt => "SAFE_HALT",
        }
    }

    /// Patch mode prescribed for this state.
    #[inline]
    pub const fn patch_mode(&self) -> PatchMode {
        match self {
            Self::Normal => PatchMode::None,
            Self::Throttle => PatchMode::Throttle,
            Self::Barrier => PatchMode::Barrier,
            Self::SafeHalt => PatchMode::SafeHalt,
        }
    }
}

impl std::fmt::Display for SafetyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode tag of a [`Patch`](super::patch::Patch).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum PatchMode {
    #[default]
    None = 0,
    Throttle = 1,
    Barrier = 2,
    SafeHalt = 3,
}

impl PatchMode {
    /// Safety state this mode corresponds to.
    #[inline]
    pub const fn state(&self) -> SafetyState {
        match self {
            Self::None => SafetyState::Normal,
            Self::Throttle => SafetyState::Throttle,
            Self::Barrier => SafetyState::Barrier,
            Self::SafeHalt => SafetyState::SafeHalt,
        }
    }
}

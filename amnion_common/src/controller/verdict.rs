//! Safety verdict produced once per tick.

use serde::Serialize;

use super::flags::ViolationFlags;
use super::limits::SafetyLimits;
use super::patch::Patch;
use super::state::SafetyState;

/// Outcome of one safety evaluation.
///
/// `allow_control` is false whenever `state` is BARRIER or SAFE_HALT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyVerdict {
    pub state: SafetyState,
    pub allow_control: bool,
    /// Reasons in guard order.
    pub reasons: Vec<String>,
    pub patch: Patch,
    /// Limits in force, echoed for the control law.
    pub limits: SafetyLimits,
    /// Guards that fired.
    #[serde(skip)]
    pub flags: ViolationFlags,
}

impl SafetyVerdict {
    /// Verdict for a state with the matching `allow_control`.
    pub fn new(
        state: SafetyState,
        reasons: Vec<String>,
        patch: Patch,
        limits: SafetyLimits,
        flags: ViolationFlags,
    ) -> Self {
        Self {
            state,
            allow_control: state.allows_control(),
            reasons,
            patch,
            limits,
            flags,
        }
    }

    /// Clean NORMAL verdict.
    pub fn normal(limits: SafetyLimits) -> Self {
        Self::new(
            SafetyState::Normal,
            Vec::new(),
            Patch::None,
            limits,
            ViolationFlags::empty(),
        )
    }

    /// Whether any reason starts with `prefix`.
    pub fn has_reason(&self, prefix: &str) -> bool {
        self.reasons.iter().any(|r| r.starts_with(prefix))
    }
}

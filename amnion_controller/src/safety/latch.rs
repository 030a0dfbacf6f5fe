//! Escalation latch: hard-violation streak and SAFE_HALT latch.
//!
//! Once latched, only an explicit [`reset`](EscalationLatch::reset) clears
//! it. Clearing the streak on a clean tick never touches the latch.

/// Streak counter plus latch flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscalationLatch {
    violation_streak: u32,
    safe_halt_latched: bool,
}

impl EscalationLatch {
    pub const fn new() -> Self {
        Self {
            violation_streak: 0,
            safe_halt_latched: false,
        }
    }

    /// Consecutive ticks with at least one hard violation.
    #[inline]
    pub const fn violation_streak(&self) -> u32 {
        self.violation_streak
    }

    #[inline]
    pub const fn is_latched(&self) -> bool {
        self.safe_halt_latched
    }

    /// Count one hard-violation tick; returns the new streak.
    pub(crate) fn record_hard_violation(&mut self) -> u32 {
        self.violation_streak = self.violation_streak.saturating_add(1);
        self.violation_streak
    }

    /// Clean tick.
    pub(crate) fn clear_streak(&mut self) {
        self.violation_streak = 0;
    }

    pub(crate) fn latch(&mut self) {
        self.safe_halt_latched = true;
    }

    /// Clear streak and latch (operator action).
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

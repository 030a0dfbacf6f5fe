//! Guard violation bitflags.
//!
//! One bit per guard. HARD flags count toward the SAFE_HALT streak; the
//! soft rate limit does not; EMERGENCY_STOP latches directly.

use bitflags::bitflags;

use super::state::SafetyState;

bitflags! {
    /// Guards that fired during one evaluation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ViolationFlags: u8 {
        /// Emergency stop asserted. **→ SAFE_HALT (latched)**.
        const EMERGENCY_STOP     = 0x01;
        /// Required field missing, non-finite or out of range. **HARD**.
        const SENSOR_INVALID     = 0x02;
        /// `power_draw > power_max`. **HARD**.
        const POWER_OVERFLOW     = 0x04;
        /// `coherence <= coherence_crit`. **HARD**.
        const COHERENCE_COLLAPSE = 0x08;
        /// `|phase_error| > phase_trip`. **HARD**.
        const PHASE_RUNAWAY      = 0x10;
        /// `|rate_change| > rate_trip`. **HARD**.
        const RATE_TRIP          = 0x20;
        /// `|rate_change| > rate_limit`. Soft.
        const RATE_LIMIT         = 0x40;
        /// Latched SAFE_HALT short-circuit.
        const LATCHED            = 0x80;
    }
}

impl ViolationFlags {
    /// Mask of the hard violations that advance the streak.
    pub const HARD_MASK: Self = Self::from_bits_truncate(
        Self::SENSOR_INVALID.bits()
            | Self::POWER_OVERFLOW.bits()
            | Self::COHERENCE_COLLAPSE.bits()
            | Self::PHASE_RUNAWAY.bits()
            | Self::RATE_TRIP.bits(),
    );

    /// Returns true if any hard violation is set.
    #[inline]
    pub const fn has_hard(&self) -> bool {
        self.intersects(Self::HARD_MASK)
    }

    /// Most severe state any set flag triggers on its own.
    pub fn severity(&self) -> SafetyState {
        if self.intersects(Self::EMERGENCY_STOP.union(Self::LATCHED)) {
            SafetyState::SafeHalt
        } else if self.has_hard() {
            SafetyState::Barrier
        } else if self.contains(Self::RATE_LIMIT) {
            SafetyState::Throttle
        } else {
            SafetyState::Normal
        }
    }
}

impl Default for ViolationFlags {
    fn default() -> Self {
        Self::empty()
    }
}

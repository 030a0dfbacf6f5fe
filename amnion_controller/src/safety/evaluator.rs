//! Per-tick safety evaluation.
//!
//! Guards run in a fixed order and every firing guard appends its reason;
//! the resulting state is the most severe one any guard triggers. Hard
//! violations advance the streak, a clean tick resets it, soft-only ticks
//! leave it untouched. Emergency stop and a full streak both latch
//! SAFE_HALT until [`SafetyEvaluator::manual_reset`].

use amnion_common::controller::flags::ViolationFlags;
use amnion_common::controller::limits::{EscalationConfig, SafetyLimits};
use amnion_common::controller::patch::Patch;
use amnion_common::controller::sensor::{REQUIRED_FIELDS, SensorField, SensorFrame};
use amnion_common::controller::state::SafetyState;
use amnion_common::controller::verdict::SafetyVerdict;
use tracing::{debug, info, warn};

use super::latch::EscalationLatch;

/// Stateful safety evaluator. Owns the escalation latch.
#[derive(Debug, Clone)]
pub struct SafetyEvaluator {
    limits: SafetyLimits,
    escalation: EscalationConfig,
    latch: EscalationLatch,
    last_state: SafetyState,
}

impl SafetyEvaluator {
    pub fn new(limits: SafetyLimits, escalation: EscalationConfig) -> Self {
        Self {
            limits,
            escalation,
            latch: EscalationLatch::new(),
            last_state: SafetyState::Normal,
        }
    }

    #[inline]
    pub const fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    #[inline]
    pub const fn escalation(&self) -> &EscalationConfig {
        &self.escalation
    }

    #[inline]
    pub const fn latch(&self) -> &EscalationLatch {
        &self.latch
    }

    /// State of the most recent verdict.
    #[inline]
    pub const fn state(&self) -> SafetyState {
        self.last_state
    }

    /// Evaluate one sanitized frame.
    pub fn evaluate(&mut self, frame: &SensorFrame) -> SafetyVerdict {
        if self.latch.is_latched() {
            self.transition(SafetyState::SafeHalt, &[]);
            return SafetyVerdict::new(
                SafetyState::SafeHalt,
                vec!["latched_safe_halt".to_string()],
                Patch::safe_halt(),
                self.limits,
                ViolationFlags::LATCHED,
            );
        }

        let mut reasons = Vec::new();
        let flags = self.check_guards(frame, &mut reasons);
        let mut state = flags.severity();

        if flags.contains(ViolationFlags::EMERGENCY_STOP) {
            self.latch.latch();
        }

        if flags.has_hard() {
            let streak = self.latch.record_hard_violation();
            if streak >= self.escalation.safe_halt_after {
                reasons.push(format!(
                    "repeated_violations>={}",
                    self.escalation.safe_halt_after
                ));
                self.latch.latch();
                state = state.escalate(SafetyState::SafeHalt);
            }
        } else if flags.is_empty() {
            self.latch.clear_streak();
        }

        self.transition(state, &reasons);
        SafetyVerdict::new(state, reasons, self.patch_for(state), self.limits, flags)
    }

    /// Clear the latch and the streak. Operator action only.
    pub fn manual_reset(&mut self) {
        warn!(
            was_latched = self.latch.is_latched(),
            streak = self.latch.violation_streak(),
            "Manual safety reset"
        );
        self.latch.reset();
        self.last_state = SafetyState::Normal;
    }

    // ─── Guards ─────────────────────────────────────────────────────

    fn check_guards(&self, frame: &SensorFrame, reasons: &mut Vec<String>) -> ViolationFlags {
        let limits = &self.limits;
        let mut flags = ViolationFlags::empty();

        if frame.emergency_stop {
            flags |= ViolationFlags::EMERGENCY_STOP;
            reasons.push("emergency_stop=true".to_string());
        }

        if self.check_validity(frame, reasons) {
            flags |= ViolationFlags::SENSOR_INVALID;
        }

        if frame
            .finite(SensorField::PowerDraw)
            .is_some_and(|p| p > limits.power_max)
        {
            flags |= ViolationFlags::POWER_OVERFLOW;
            reasons.push(format!("power_overflow:power_draw>{}", limits.power_max));
        }

        if frame
            .finite(SensorField::Coherence)
            .is_some_and(|q| q <= limits.coherence_crit)
        {
            flags |= ViolationFlags::COHERENCE_COLLAPSE;
            reasons.push(format!("coherence_collapse:coherence<={}", limits.coherence_crit));
        }

        if frame
            .finite(SensorField::PhaseError)
            .is_some_and(|e| e.abs() > limits.phase_trip)
        {
            flags |= ViolationFlags::PHASE_RUNAWAY;
            reasons.push(format!("phase_runaway:|phase_error|>{}", limits.phase_trip));
        }

        if let Some(rate) = frame.finite(SensorField::RateChange).map(f64::abs) {
            if rate > limits.rate_trip {
                flags |= ViolationFlags::RATE_TRIP;
                reasons.push(format!("rate_trip:|rate_change|>{}", limits.rate_trip));
            } else if rate > limits.rate_limit {
                flags |= ViolationFlags::RATE_LIMIT;
                reasons.push(format!("rate_limit:|rate_change|>{}", limits.rate_limit));
            }
        }

        flags
    }

    /// Missing, non-finite and out-of-domain fields. Returns true if any.
    fn check_validity(&self, frame: &SensorFrame, reasons: &mut Vec<String>) -> bool {
        let before = reasons.len();

        for field in SensorField::ALL {
            match frame.get(field) {
                None if REQUIRED_FIELDS.contains(&field) => {
                    reasons.push(format!("missing:{}", field.key()));
                }
                Some(v) if !v.is_finite() => {
                    reasons.push(format!("non_finite:{}", field.key()));
                }
                _ => {}
            }
        }

        if frame
            .finite(SensorField::Coherence)
            .is_some_and(|q| !(0.0..=1.0).contains(&q))
        {
            reasons.push("out_of_range:coherence".to_string());
        }
        if frame.finite(SensorField::PowerDraw).is_some_and(|p| p < 0.0) {
            reasons.push("negative:power_draw".to_string());
        }

        reasons.len() > before
    }

    // ─── Helpers ────────────────────────────────────────────────────

    fn patch_for(&self, state: SafetyState) -> Patch {
        match state {
            SafetyState::Normal => Patch::None,
            SafetyState::Throttle => Patch::throttle(&self.escalation, &self.limits),
            SafetyState::Barrier => Patch::barrier(&self.limits),
            SafetyState::SafeHalt => Patch::safe_halt(),
        }
    }

    fn transition(&mut self, next: SafetyState, reasons: &[String]) {
        let prev = self.last_state;
        if next > prev {
            warn!(from = %prev, to = %next, ?reasons, "Safety state escalated");
        } else if next < prev {
            info!(from = %prev, to = %next, "Safety state relaxed");
        } else if !reasons.is_empty() {
            debug!(state = %next, ?reasons, "Safety state held");
        }
        self.last_state = next;
    }
}

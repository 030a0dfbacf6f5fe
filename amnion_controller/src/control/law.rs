//! Control-law engine.
//!
//! Stateless: the same frame and verdict always produce the same
//! [`ControlFrame`]. The effective mode is the stricter of the patch mode
//! and the verdict state, and never below BARRIER when the verdict
//! withholds control.

use amnion_common::config::ConfigError;
use amnion_common::consts::MAX_NOTES;
use amnion_common::controller::control::{ControlFrame, ControlLawConfig};
use amnion_common::controller::patch::{Damping, Patch};
use amnion_common::controller::sensor::SensorFrame;
use amnion_common::controller::state::PatchMode;
use amnion_common::controller::verdict::SafetyVerdict;
use heapless::Vec;

use super::envelope::{bound_command, clamp, sanitize_cap};

/// Bounded control-law generator.
#[derive(Debug, Clone, Copy)]
pub struct ControlLawEngine {
    cfg: ControlLawConfig,
}

impl ControlLawEngine {
    /// Build an engine over a validated envelope.
    pub fn new(cfg: ControlLawConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    #[inline]
    pub const fn config(&self) -> &ControlLawConfig {
        &self.cfg
    }

    /// Compute the actuator command for one tick. Never fails.
    pub fn compute(&self, frame: &SensorFrame, verdict: &SafetyVerdict) -> ControlFrame {
        let cfg = &self.cfg;
        let limits = &verdict.limits;
        let power_max = sanitize_cap(limits.power_max);
        let desired = clamp(frame.requested_u(), cfg.u_min, cfg.u_max);

        let mode = Self::effective_mode(verdict);
        match mode {
            PatchMode::SafeHalt => {
                let damping = match verdict.patch {
                    Patch::SafeHalt { damping } => damping,
                    _ => Damping::High,
                };
                ControlFrame {
                    state: mode.state(),
                    u_cmd: cfg.u_safe_halt,
                    gain: 0.0,
                    coupling: 0.0,
                    damping: self.map_damping(damping),
                    power_budget: 0.0,
                    notes: notes(&["safe_halt"]),
                }
            }
            PatchMode::Barrier => {
                let (damping, budget, freeze) = match verdict.patch {
                    Patch::Barrier {
                        damping,
                        power_budget,
                        freeze_fast_adaptation,
                    } => (damping, power_budget, freeze_fast_adaptation),
                    _ => (Damping::High, limits.power_budget_min, true),
                };
                let cap = power_max.min(sanitize_cap(budget));
                let barrier_notes: &[&'static str] = if freeze {
                    &["barrier", "freeze_fast_adaptation"]
                } else {
                    &["barrier"]
                };
                ControlFrame {
                    state: mode.state(),
                    u_cmd: bound_command(desired, cap, cfg),
                    gain: 0.0,
                    coupling: 0.0,
                    damping: self.map_damping(damping),
                    power_budget: cap,
                    notes: notes(barrier_notes),
                }
            }
            PatchMode::Throttle => {
                let (gain_scale, coupling_scale, damping_boost, budget) = match verdict.patch {
                    Patch::Throttle {
                        gain_scale,
                        coupling_scale,
                        damping_boost,
                        power_budget,
                    } => (gain_scale, coupling_scale, damping_boost, power_budget),
                    _ => (1.0, 1.0, 1.0, limits.power_budget_soft),
                };
                let cap = power_max.min(sanitize_cap(budget));
                ControlFrame {
                    state: mode.state(),
                    u_cmd: bound_command(desired, cap, cfg),
                    gain: floor_zero(self.gain(frame) * gain_scale),
                    coupling: floor_zero(self.coupling(frame) * coupling_scale),
                    damping: floor_zero(self.damping(frame) * damping_boost),
                    power_budget: cap,
                    notes: notes(&["throttle"]),
                }
            }
            PatchMode::None => ControlFrame {
                state: mode.state(),
                u_cmd: bound_command(desired, power_max, cfg),
                gain: self.gain(frame),
                coupling: self.coupling(frame),
                damping: self.damping(frame),
                power_budget: power_max,
                notes: notes(&["normal"]),
            },
        }
    }

    /// Stricter of patch mode and state; BARRIER at least when control is
    /// withheld.
    pub fn effective_mode(verdict: &SafetyVerdict) -> PatchMode {
        let mode = verdict.patch.mode().max(verdict.state.patch_mode());
        if verdict.allow_control {
            mode
        } else {
            mode.max(PatchMode::Barrier)
        }
    }

    /// Resolve a damping request to a number.
    pub fn map_damping(&self, damping: Damping) -> f64 {
        match damping {
            Damping::High => self.cfg.damping_high,
            Damping::Low => self.cfg.damping_default,
            Damping::Value(v) if v.is_finite() => v,
            Damping::Value(_) => self.cfg.damping_high,
        }
    }

    // ─── Frame parameters with configured fallbacks ─────────────────

    fn gain(&self, frame: &SensorFrame) -> f64 {
        frame.gain.filter(|v| v.is_finite()).unwrap_or(self.cfg.gain_default)
    }

    fn coupling(&self, frame: &SensorFrame) -> f64 {
        frame
            .coupling
            .filter(|v| v.is_finite())
            .unwrap_or(self.cfg.coupling_default)
    }

    fn damping(&self, frame: &SensorFrame) -> f64 {
        frame
            .damping
            .filter(|v| v.is_finite())
            .unwrap_or(self.cfg.damping_default)
    }
}

#[inline]
fn floor_zero(x: f64) -> f64 {
    if x.is_finite() { x.max(0.0) } else { 0.0 }
}

fn notes(items: &[&'static str]) -> Vec<&'static str, MAX_NOTES> {
    let mut out = Vec::new();
    for item in items {
        // Capacity covers every branch; overflow would only drop a note.
        let _ = out.push(*item);
    }
    out
}

//! Actuator envelope clamping.
//!
//! Two stages: first into `[0, cap]` (the power budget), then into the
//! configured `[u_min, u_max]`. With `u_min <= 0 <= u_max` the result sits
//! inside both.

use amnion_common::controller::control::ControlLawConfig;

/// Non-panicking clamp. `lo` wins if `lo > hi`.
#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.min(hi).max(lo)
}

/// Usable cap: non-finite or negative becomes 0.
#[inline]
pub fn sanitize_cap(cap: f64) -> f64 {
    if cap.is_finite() && cap > 0.0 { cap } else { 0.0 }
}

/// Clamp `desired` into the power budget, then into the envelope.
#[inline]
pub fn bound_command(desired: f64, cap: f64, cfg: &ControlLawConfig) -> f64 {
    let desired = if desired.is_finite() { desired } else { 0.0 };
    let cap = sanitize_cap(cap);
    clamp(clamp(desired, 0.0, cap), cfg.u_min, cfg.u_max)
}

//! Workspace-wide default constants.
//!
//! Single source of truth for every numeric default used by the safety
//! limits, the escalation policy and the control law. Config structs take
//! their serde defaults from here.

use static_assertions::const_assert;

// ─── Safety Limits ──────────────────────────────────────────────────

/// Hard actuator power limit.
pub const POWER_MAX: f64 = 1.0;

/// Power budget while in BARRIER.
pub const POWER_BUDGET_MIN: f64 = 0.1;

/// Power budget while in THROTTLE.
pub const POWER_BUDGET_SOFT: f64 = 0.7;

/// Coherence at or below this value is a collapse.
pub const COHERENCE_CRIT: f64 = 0.5;

/// Absolute phase error trip [rad].
pub const PHASE_TRIP: f64 = 0.5;

/// Absolute rate-of-change hard trip [units/tick].
pub const RATE_TRIP: f64 = 1.0;

/// Absolute rate-of-change soft limit [units/tick].
pub const RATE_LIMIT: f64 = 0.5;

// ─── Escalation ─────────────────────────────────────────────────────

/// Consecutive hard-violation ticks before SAFE_HALT latches.
pub const SAFE_HALT_AFTER: u32 = 3;

/// THROTTLE gain scale and its allowed range.
pub const THROTTLE_GAIN_SCALE: f64 = 0.7;
pub const THROTTLE_GAIN_SCALE_MIN: f64 = 0.5;
pub const THROTTLE_GAIN_SCALE_MAX: f64 = 0.7;

/// THROTTLE coupling scale and its allowed range.
pub const THROTTLE_COUPLING_SCALE: f64 = 0.7;
pub const THROTTLE_COUPLING_SCALE_MIN: f64 = 0.5;
pub const THROTTLE_COUPLING_SCALE_MAX: f64 = 0.7;

/// THROTTLE damping boost and its allowed range.
pub const THROTTLE_DAMPING_BOOST: f64 = 1.3;
pub const THROTTLE_DAMPING_BOOST_MIN: f64 = 1.3;
pub const THROTTLE_DAMPING_BOOST_MAX: f64 = 2.0;

// ─── Control Law ────────────────────────────────────────────────────

/// Actuator envelope.
pub const U_MIN: f64 = 0.0;
pub const U_MAX: f64 = 1.0;

/// Command issued while in SAFE_HALT.
pub const U_SAFE_HALT: f64 = 0.0;

/// Default control coefficients when the frame does not provide them.
pub const GAIN_DEFAULT: f64 = 1.0;
pub const COUPLING_DEFAULT: f64 = 1.0;
pub const DAMPING_DEFAULT: f64 = 0.1;

/// Numeric value of the symbolic "HIGH" damping level.
pub const DAMPING_HIGH: f64 = 1.0;

// ─── Metrics ────────────────────────────────────────────────────────

/// Bounded metrics history length.
pub const METRICS_MAX_HISTORY: usize = 512;

/// Capacity of the non-blocking metrics channel.
pub const METRICS_CHANNEL_CAPACITY: usize = 256;

// ─── Paths ──────────────────────────────────────────────────────────

/// Default configuration file path for the controller binary.
pub const DEFAULT_CONFIG_PATH: &str = "config/amnion.toml";

/// Upper bound on notes a single control frame can carry.
pub const MAX_NOTES: usize = 4;

const_assert!(POWER_BUDGET_MIN <= POWER_BUDGET_SOFT);
const_assert!(POWER_BUDGET_SOFT <= POWER_MAX);
const_assert!(RATE_LIMIT < RATE_TRIP);
const_assert!(U_MIN <= U_SAFE_HALT);
const_assert!(U_SAFE_HALT <= 0.0);
const_assert!(SAFE_HALT_AFTER >= 1);

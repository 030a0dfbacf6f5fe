//! Prelude module for common re-exports.
//!
//! ```rust
//! use amnion_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig, load_config_dir};
pub use crate::controller::config::{AmnionConfig, MetricsConfig};

// ─── Safety Model ───────────────────────────────────────────────────
pub use crate::controller::flags::ViolationFlags;
pub use crate::controller::limits::{EscalationConfig, SafetyLimits};
pub use crate::controller::patch::{Damping, Patch};
pub use crate::controller::state::{PatchMode, SafetyState};
pub use crate::controller::verdict::SafetyVerdict;

// ─── Frames ─────────────────────────────────────────────────────────
pub use crate::controller::control::{ControlFrame, ControlLawConfig};
pub use crate::controller::sensor::{SensorField, SensorFrame};

//! Top-level controller configuration.
//!
//! All sections are optional in TOML; a missing section takes its defaults.
//! Immutable after load.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{METRICS_CHANNEL_CAPACITY, METRICS_MAX_HISTORY};

use super::control::ControlLawConfig;
use super::limits::{EscalationConfig, SafetyLimits};

/// Metrics collaborator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// When false the collector ignores every record.
    pub enabled: bool,
    /// Bounded history length.
    pub max_history: usize,
    /// Capacity of the non-blocking metrics channel.
    pub channel_capacity: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history: METRICS_MAX_HISTORY,
            channel_capacity: METRICS_CHANNEL_CAPACITY,
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::ValidationError(
                "metrics.max_history must be >= 1".to_string(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "metrics.channel_capacity must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete controller configuration.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "amnion-loop-01"
///
/// [safety]
/// power_max = 1.0
///
/// [escalation]
/// safe_halt_after = 3
///
/// [control]
/// u_max = 1.0
///
/// [metrics]
/// max_history = 512
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AmnionConfig {
    pub shared: SharedConfig,
    pub safety: SafetyLimits,
    pub escalation: EscalationConfig,
    pub control: ControlLawConfig,
    pub metrics: MetricsConfig,
}

impl AmnionConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.safety.validate()?;
        self.escalation.validate()?;
        self.control.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}

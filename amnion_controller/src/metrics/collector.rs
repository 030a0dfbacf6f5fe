//! In-process metrics collector with bounded history.

use std::collections::VecDeque;

use amnion_common::controller::config::MetricsConfig;
use amnion_common::controller::control::ControlFrame;
use amnion_common::controller::sensor::SensorFrame;
use amnion_common::controller::verdict::SafetyVerdict;
use serde::Serialize;

use super::{MetricsError, MetricsSink, TickRecord};

/// One recorded tick with running counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSummary {
    /// 1-based collector tick count.
    pub tick: u64,
    pub ok: bool,
    pub violations_total: u64,
    #[serde(flatten)]
    pub record: TickRecord,
}

/// Counters plus the most recent tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub enabled: bool,
    pub ticks: u64,
    pub violations: u64,
    pub last: Option<TickSummary>,
}

/// Metrics collector.
#[derive(Debug, Clone)]
pub struct Metrics {
    cfg: MetricsConfig,
    ticks: u64,
    violations: u64,
    history: VecDeque<TickSummary>,
}

impl Metrics {
    pub fn new(cfg: MetricsConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(cfg.max_history.min(1024)),
            cfg,
            ticks: 0,
            violations: 0,
        }
    }

    #[inline]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub const fn violations(&self) -> u64 {
        self.violations
    }

    /// Store one record. Ignored when disabled.
    pub fn ingest(&mut self, record: TickRecord) {
        if !self.cfg.enabled {
            return;
        }
        self.ticks += 1;
        let ok = !record.is_violation();
        if !ok {
            self.violations += 1;
        }
        if self.history.len() >= self.cfg.max_history {
            self.history.pop_front();
        }
        self.history.push_back(TickSummary {
            tick: self.ticks,
            ok,
            violations_total: self.violations,
            record,
        });
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            enabled: self.cfg.enabled,
            ticks: self.ticks,
            violations: self.violations,
            last: self.history.back().cloned(),
        }
    }

    /// Most recent `n` ticks (all retained when `None`), oldest first.
    pub fn history(&self, n: Option<usize>) -> Vec<TickSummary> {
        let take = n.unwrap_or(self.history.len()).min(self.history.len());
        self.history
            .iter()
            .skip(self.history.len() - take)
            .cloned()
            .collect()
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
        self.violations = 0;
        self.history.clear();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(MetricsConfig::default())
    }
}

impl MetricsSink for Metrics {
    fn record(
        &mut self,
        sensors: &SensorFrame,
        verdict: &SafetyVerdict,
        control: &ControlFrame,
    ) -> Result<(), MetricsError> {
        self.ingest(TickRecord::new(sensors, verdict, control));
        Ok(())
    }
}

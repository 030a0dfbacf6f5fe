//! Non-blocking metrics hand-off to a collector thread.
//!
//! The control loop only ever calls `try_send`; a full channel drops the
//! record and reports [`MetricsError::ChannelFull`].

use std::io;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use std::thread::{self, JoinHandle};

use amnion_common::controller::config::MetricsConfig;
use amnion_common::controller::control::ControlFrame;
use amnion_common::controller::sensor::SensorFrame;
use amnion_common::controller::verdict::SafetyVerdict;
use tracing::debug;

use super::collector::Metrics;
use super::{MetricsError, MetricsSink, TickRecord};

/// Sending half of the metrics channel.
#[derive(Debug)]
pub struct ChannelSink {
    tx: SyncSender<TickRecord>,
    dropped: u64,
}

impl ChannelSink {
    /// Bounded channel of `capacity` records (at least 1).
    pub fn new(capacity: usize) -> (Self, Receiver<TickRecord>) {
        let (tx, rx) = sync_channel(capacity.max(1));
        (Self { tx, dropped: 0 }, rx)
    }

    /// Records dropped because the channel was full.
    #[inline]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl MetricsSink for ChannelSink {
    fn record(
        &mut self,
        sensors: &SensorFrame,
        verdict: &SafetyVerdict,
        control: &ControlFrame,
    ) -> Result<(), MetricsError> {
        match self.tx.try_send(TickRecord::new(sensors, verdict, control)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                Err(MetricsError::ChannelFull)
            }
            Err(TrySendError::Disconnected(_)) => Err(MetricsError::Disconnected),
        }
    }
}

/// Spawn the collector thread. It drains `rx` until every sender is
/// dropped, then returns the collected [`Metrics`] on join.
pub fn spawn_collector(
    rx: Receiver<TickRecord>,
    cfg: MetricsConfig,
) -> io::Result<JoinHandle<Metrics>> {
    thread::Builder::new()
        .name("amnion-metrics".to_string())
        .spawn(move || {
            let mut metrics = Metrics::new(cfg);
            for record in rx {
                metrics.ingest(record);
            }
            debug!(ticks = metrics.ticks(), "Metrics collector drained");
            metrics
        })
}

//! Metrics collaborator wiring.

use amnion_common::controller::config::{AmnionConfig, MetricsConfig};
use amnion_common::controller::state::SafetyState;
use amnion_controller::cycle::Controller;
use amnion_controller::metrics::{ChannelSink, spawn_collector};
use serde_json::json;

use super::{metered_controller, nominal, with};

#[test]
fn collector_records_each_tick() {
    let mut c = metered_controller();
    c.tick_value(&with(json!({ "tick": 7, "desired_u": 0.3 })));
    c.tick_value(&with(json!({ "coherence": 0.2 })));

    let snap = c.metrics().snapshot();
    assert_eq!(snap.ticks, 2);
    assert_eq!(snap.violations, 1);
    let last = snap.last.unwrap();
    assert_eq!(last.record.state, SafetyState::Barrier);
    assert!(last.record.reasons[0].starts_with("coherence_collapse"));

    let history = c.metrics().history(None);
    assert_eq!(history[0].record.frame_tick, Some(7));
    assert_eq!(history[0].record.u_cmd, 0.3);
}

#[test]
fn snapshot_serializes_to_json() {
    let mut c = metered_controller();
    c.tick_value(&nominal());
    let value = serde_json::to_value(c.metrics().snapshot()).unwrap();
    assert_eq!(value["ticks"], 1);
    assert_eq!(value["last"]["state"], "NORMAL");
    assert_eq!(value["last"]["ok"], true);
}

#[test]
fn full_channel_never_blocks_the_loop() {
    let (sink, _rx) = ChannelSink::new(2);
    let mut c = Controller::new(&AmnionConfig::default(), sink).unwrap();
    for _ in 0..10 {
        assert_eq!(c.tick_value(&nominal()).state, SafetyState::Normal);
    }
    assert_eq!(c.stats().ticks, 10);
    assert_eq!(c.stats().metrics_failures, 8);
    assert_eq!(c.metrics().dropped(), 8);
}

#[test]
fn threaded_collector_sees_all_ticks() {
    let cfg = AmnionConfig {
        metrics: MetricsConfig {
            channel_capacity: 64,
            ..Default::default()
        },
        ..Default::default()
    };
    let (sink, rx) = ChannelSink::new(cfg.metrics.channel_capacity);
    let handle = spawn_collector(rx, cfg.metrics).unwrap();
    let mut c = Controller::new(&cfg, sink).unwrap();
    for i in 0..20 {
        c.tick_value(&with(json!({ "tick": i })));
    }
    drop(c.into_metrics());
    let metrics = handle.join().unwrap();
    assert_eq!(metrics.ticks(), 20);
    assert_eq!(metrics.history(Some(1))[0].record.frame_tick, Some(19));
}

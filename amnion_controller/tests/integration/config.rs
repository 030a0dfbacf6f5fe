//! Configuration loading feeding a live controller.

use std::fs;

use amnion_common::controller::state::SafetyState;
use amnion_controller::config::{load_config, load_config_dir};
use amnion_controller::cycle::Controller;
use amnion_controller::metrics::NullSink;
use serde_json::json;
use tempfile::TempDir;

use super::with;

#[test]
fn custom_limits_change_guard_thresholds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("amnion.toml");
    fs::write(
        &path,
        r#"
[safety]
power_max = 2.0

[escalation]
safe_halt_after = 2
"#,
    )
    .unwrap();

    let cfg = load_config(&path).unwrap();
    let mut c = Controller::new(&cfg, NullSink).unwrap();
    assert_eq!(
        c.tick_value(&with(json!({ "power_draw": 1.5 }))).state,
        SafetyState::Normal
    );
    let over = with(json!({ "power_draw": 2.5 }));
    assert_eq!(c.tick_value(&over).state, SafetyState::Barrier);
    assert_eq!(c.tick_value(&over).state, SafetyState::SafeHalt);
}

#[test]
fn config_dir_merges_in_name_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("00-base.toml"), "[safety]\nrate_limit = 0.4\n").unwrap();
    fs::write(dir.path().join("10-site.toml"), "[safety]\nrate_limit = 0.3\n").unwrap();

    let cfg = load_config_dir(dir.path()).unwrap();
    assert_eq!(cfg.safety.rate_limit, 0.3);

    let mut c = Controller::new(&cfg, NullSink).unwrap();
    assert_eq!(
        c.tick_value(&with(json!({ "rate_change": 0.35 }))).state,
        SafetyState::Throttle
    );
}

#[test]
fn invalid_file_never_builds_a_controller() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[safety]\npower_budget_min = 5.0\n").unwrap();
    assert!(load_config(&path).is_err());
}

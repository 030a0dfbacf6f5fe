//! JSON-lines streaming through a metered controller.

use std::io::Cursor;

use amnion_controller::stream::run_lines;
use serde_json::Value;

use super::{metered_controller, nominal};

fn nominal_line() -> Vec<u8> {
    let mut line = nominal().to_string().into_bytes();
    line.push(b'\n');
    line
}

fn frames(out: &[u8]) -> Vec<Value> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn invalid_utf8_line_is_ticked_not_fatal() {
    let mut input = nominal_line();
    input.extend_from_slice(b"{\"power_draw\":\"\xff\xfe\",\"coherence\":0.9}\n");
    input.extend(nominal_line());

    let mut c = metered_controller();
    let mut out = Vec::new();
    let ticks = run_lines(&mut c, Cursor::new(input), &mut out).unwrap();

    assert_eq!(ticks, 3);
    let frames = frames(&out);
    assert_eq!(frames.len(), 3);
    let states: Vec<&str> = frames
        .iter()
        .map(|f| f["output"]["state"].as_str().unwrap())
        .collect();
    assert_eq!(states, ["NORMAL", "BARRIER", "NORMAL"]);
    assert_eq!(frames[2]["tick"], 2);
    assert_eq!(c.metrics().ticks(), 3);
}

#[test]
fn garbage_and_blank_lines() {
    let mut input = b"\xff\xfe\xfd\n\n   \nnot json\n".to_vec();
    input.extend(nominal_line());

    let mut c = metered_controller();
    let mut out = Vec::new();
    let ticks = run_lines(&mut c, Cursor::new(input), &mut out).unwrap();

    // Blank lines do not tick; the two unreadable ones do.
    assert_eq!(ticks, 3);
    let frames = frames(&out);
    assert_eq!(frames[0]["output"]["state"], "BARRIER");
    assert_eq!(frames[1]["output"]["state"], "BARRIER");
    assert_eq!(frames[2]["output"]["state"], "NORMAL");
    assert_eq!(c.evaluator().latch().violation_streak(), 0);
}

#[test]
fn last_line_without_newline_is_ticked() {
    let input = nominal().to_string();
    let mut c = metered_controller();
    let mut out = Vec::new();
    assert_eq!(run_lines(&mut c, input.as_bytes(), &mut out).unwrap(), 1);
    assert_eq!(frames(&out)[0]["output"]["state"], "NORMAL");
}

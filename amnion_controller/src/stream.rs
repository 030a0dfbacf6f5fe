//! JSON-lines observation stream.
//!
//! One observation per line in, one `{"tick", "output"}` line out. Invalid
//! UTF-8 is replaced with U+FFFD and a line that is not JSON ticks as an
//! empty observation, so a corrupt line yields a BARRIER frame instead of
//! ending the run. Blank lines are skipped. Only I/O errors end the stream.

use std::io::{self, BufRead, Write};

use amnion_common::controller::control::ControlFrame;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::cycle::Controller;
use crate::metrics::MetricsSink;

/// Tick `controller` once per non-blank line of `reader`, writing each
/// control frame to `out`. Returns the number of ticks run.
pub fn run_lines<M, R, W>(
    controller: &mut Controller<M>,
    mut reader: R,
    mut out: W,
) -> io::Result<u64>
where
    M: MetricsSink,
    R: BufRead,
    W: Write,
{
    let mut buf = Vec::new();
    let mut lineno = 0u64;
    let mut ticks = 0u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        lineno += 1;

        let Some(raw) = parse_line(&buf, lineno) else {
            continue;
        };
        let frame = controller.tick_value(&raw);
        write_frame(&mut out, ticks, &frame)?;
        ticks += 1;
    }

    Ok(ticks)
}

/// Decode one line, lossily. `None` for a blank line; content that is not
/// JSON becomes an empty object.
pub fn parse_line(bytes: &[u8], lineno: u64) -> Option<Value> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let raw = serde_json::from_str::<Value>(text).unwrap_or_else(|e| {
        warn!("line {lineno}: unreadable observation ({e}), treating as empty");
        Value::Object(Map::new())
    });
    Some(raw)
}

/// Write one output line.
pub fn write_frame<W: Write>(out: &mut W, tick: u64, frame: &ControlFrame) -> io::Result<()> {
    writeln!(out, "{}", json!({ "tick": tick, "output": frame }))
}

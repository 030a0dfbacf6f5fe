//! # AMNION Controller
//!
//! Runs the safety interlock over a stream of observations and prints one
//! JSON control frame per tick.
//!
//! Observations come from `--input` (JSON lines, `-` for stdin) or, without
//! it, from a built-in nominal frame repeated `--ticks` times. A metrics
//! snapshot is logged on exit.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process;

use amnion_common::consts::DEFAULT_CONFIG_PATH;
use amnion_common::controller::config::AmnionConfig;
use amnion_controller::config::resolve;
use amnion_controller::cycle::Controller;
use amnion_controller::metrics::{ChannelSink, spawn_collector};
use amnion_controller::stream::{run_lines, write_frame};
use clap::Parser;
use serde_json::{Value, json};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// AMNION safety interlock
#[derive(Parser, Debug)]
#[command(name = "amnion_controller")]
#[command(version)]
#[command(about = "Deterministic safety interlock and bounded control-law generator")]
struct Args {
    /// Directory of TOML files merged in name order.
    /// Preferred over the positional config path.
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Path to a single configuration TOML.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Ticks to run on the built-in nominal frame when no input is given.
    #[arg(long, default_value_t = 3)]
    ticks: u32,

    /// JSON-lines observation file, `-` for stdin.
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check_config: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = resolve(
        args.config_dir.as_deref(),
        &args.config,
        args.config == PathBuf::from(DEFAULT_CONFIG_PATH),
    );
    let level = loaded
        .as_ref()
        .ok()
        .and_then(|(cfg, _)| cfg.shared.log_level.as_directive().parse().ok())
        .unwrap_or(Level::INFO);
    setup_tracing(&args, level);

    info!("AMNION Controller v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok((cfg, source)) => {
            if source.is_defaults() {
                warn!("Using {source}");
            } else {
                info!("Loaded config from {source}");
            }
            cfg
        }
        Err(e) => {
            error!("FATAL: config: {e}");
            process::exit(1);
        }
    };

    if args.check_config {
        info!("Config OK: service={}", config.shared.service_name);
        return;
    }

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("AMNION Controller shutdown complete");
}

fn run(args: &Args, config: &AmnionConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Config OK: service={}, power_max={}, safe_halt_after={}",
        config.shared.service_name, config.safety.power_max, config.escalation.safe_halt_after,
    );

    let (sink, rx) = ChannelSink::new(config.metrics.channel_capacity);
    let collector = spawn_collector(rx, config.metrics)?;
    let mut controller = Controller::new(config, sink)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.input {
        Some(path) => {
            let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
                Box::new(BufReader::new(io::stdin()))
            } else {
                Box::new(BufReader::new(File::open(path)?))
            };
            run_lines(&mut controller, reader, &mut out)?;
        }
        None => {
            let raw = nominal_observation();
            for tick in 0..u64::from(args.ticks) {
                let frame = controller.tick_value(&raw);
                write_frame(&mut out, tick, &frame)?;
            }
        }
    }
    out.flush()?;

    let stats = controller.stats().clone();
    let sink = controller.into_metrics();
    if sink.dropped() > 0 {
        warn!("{} metrics records dropped (channel full)", sink.dropped());
    }
    drop(sink);

    let metrics = collector
        .join()
        .map_err(|_| "metrics collector thread panicked")?;
    info!(
        ticks = stats.ticks,
        violations = stats.violations,
        metrics_failures = stats.metrics_failures,
        "Run complete"
    );
    info!("Metrics snapshot: {}", serde_json::to_string(&metrics.snapshot())?);
    Ok(())
}

/// Observation used when no input stream is given.
fn nominal_observation() -> Value {
    json!({
        "power_in": 10.0,
        "power_draw": 0.5,
        "coherence": 0.95,
        "phase_error": 0.0,
        "rate_change": 0.0,
        "desired_u": 0.5,
        "emergency_stop": false,
    })
}

fn setup_tracing(args: &Args, configured: Level) {
    let level = if args.verbose { Level::DEBUG } else { configured };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_writer(io::stderr)
            .init();
    }
}

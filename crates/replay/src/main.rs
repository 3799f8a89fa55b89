//! DMS trace replay - entry point

use anyhow::{Context, Result};
use clap::Parser;
use dms::{CalibrationProfile, DmsModule, ThresholdConfig};
use replay::{init_logging, parse_calibration, replay, ReplayOptions};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "dms-replay", about = "Replay a landmark trace through the DMS engine")]
struct Cli {
    /// JSON-lines landmark trace
    #[arg(short, long)]
    input: PathBuf,

    /// Threshold config file (TOML or JSON); DMS_* env vars override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Calibration baseline as gaze,head_x,head_y
    #[arg(long, value_parser = parse_calibration)]
    calibrate: Option<CalibrationProfile>,

    /// Calibrate from the first frame's calibration sample
    #[arg(long, conflicts_with = "calibrate")]
    auto_calibrate: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    info!("=== DMS replay v{} ===", env!("CARGO_PKG_VERSION"));

    let thresholds =
        ThresholdConfig::load(cli.config.as_deref()).context("Failed to load thresholds")?;
    let mut engine = DmsModule::new(thresholds);
    if let Some(profile) = cli.calibrate {
        engine.calibrate(profile);
    }

    let file = File::open(&cli.input)
        .with_context(|| format!("Failed to open trace {}", cli.input.display()))?;

    let stdout = io::stdout();
    replay(
        &mut engine,
        BufReader::new(file),
        stdout.lock(),
        ReplayOptions {
            auto_calibrate: cli.auto_calibrate,
        },
    )?;

    Ok(())
}

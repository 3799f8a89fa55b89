//! Landmark Trace Replay
//!
//! Feeds a JSON-lines trace of landmark frames through one engine and
//! writes one detection output per frame as JSON lines.

use anyhow::{Context, Result};
use dms::{CalibrationProfile, DmsModule, LandmarkFrame};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber (logs go to stderr)
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Parse `gaze,head_x,head_y` into a calibration baseline
pub fn parse_calibration(s: &str) -> Result<CalibrationProfile, String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("invalid number {v:?}: {e}")))
        .collect::<Result<_, _>>()?;

    match values[..] {
        [gaze_center, head_center_x, head_center_y] => Ok(CalibrationProfile {
            gaze_center,
            head_center_x,
            head_center_y,
        }),
        _ => Err(format!("expected gaze,head_x,head_y, got {} value(s)", values.len())),
    }
}

/// Replay counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub lines: u64,
    pub frames: u64,
    pub skipped: u64,
    /// Fresh alerts raised
    pub alerts: u64,
}

/// Replay options
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Calibrate from the first calibration sample the engine reports
    pub auto_calibrate: bool,
}

/// Run every frame of `input` through `engine`, writing outputs to `output`
///
/// Blank lines are ignored; lines that do not parse as a frame are skipped.
pub fn replay<R: BufRead, W: Write>(
    engine: &mut DmsModule,
    input: R,
    mut output: W,
    options: ReplayOptions,
) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (n, line) in input.lines().enumerate() {
        let line = line.context("Failed to read trace line")?;
        stats.lines += 1;
        if line.trim().is_empty() {
            continue;
        }

        let frame: LandmarkFrame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping line {}: {}", n + 1, e);
                stats.skipped += 1;
                continue;
            }
        };

        let detection = engine.process_frame(&frame);
        stats.frames += 1;
        stats.alerts += detection.fresh_alerts().count() as u64;

        for alert in detection.fresh_alerts() {
            debug!("t={}ms {}", frame.timestamp_ms, alert.message);
        }

        serde_json::to_writer(&mut output, &detection).context("Failed to write output")?;
        output.write_all(b"\n").context("Failed to write output")?;

        if options.auto_calibrate {
            if let Some(sample) = detection.calibration_data {
                engine.calibrate(sample.into());
            }
        }
    }

    output.flush().context("Failed to flush output")?;
    info!(
        "Replayed {} frame(s), skipped {} line(s), raised {} alert(s)",
        stats.frames, stats.skipped, stats.alerts
    );
    Ok(stats)
}

//! CLI output formatting.
//!
//! Formatting is split from printing so the text can be tested.

use serde::Serialize;

use crate::config::MAX_SAMPLES_TARGET;
use crate::engine::driver::FrameReport;
use crate::engine::state::{Phase, SimulationState};

/// Final report of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Seed that reproduces this run.
    pub seed: u64,
    /// Frames scheduled.
    pub frames: u64,
    /// Phase the run ended in.
    pub phase: Phase,
    /// Final totals.
    pub state: SimulationState,
    /// |π̂ − π|, if any sample was drawn.
    pub absolute_error: Option<f64>,
}

impl RunSummary {
    /// Summarise a finished run.
    #[must_use]
    pub fn new(seed: u64, frames: u64, state: SimulationState) -> Self {
        Self {
            seed,
            frames,
            phase: state.phase(),
            state,
            absolute_error: state.absolute_error(),
        }
    }
}

/// Print version information.
pub fn print_version() {
    println!("mcpi {}", env!("CARGO_PKG_VERSION"));
    if let Some(hash) = option_env!("GIT_HASH") {
        if !hash.is_empty() {
            println!("commit {hash}");
        }
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"mcpi - Monte Carlo estimation of π

USAGE:
    mcpi <COMMAND> [OPTIONS]

COMMANDS:
    run                         Run an estimation
        -c, --config <FILE>     Load settings from a YAML file
        -n, --target <N>        Samples to draw (1-{MAX_SAMPLES_TARGET}, default: 1000)
        -b, --batch <N>         Samples per frame (default: 250)
        --seed <N>              Fix the seed (default: random)
        --fps <N>               Frames per second when paced (default: 60)
        --no-pace               Run frames back to back
        --json                  Print a JSON summary instead of progress
        -v, --verbose           Enable debug logging

    validate <config.yaml>      Validate a configuration file

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    mcpi run --target 50000
    mcpi run --target 99999 --seed 42 --no-pace --json
    mcpi validate mcpi.yaml

Set RUST_LOG to control log output (e.g. RUST_LOG=mcpi=debug).
"
    );
}

/// One progress line for a frame.
#[must_use]
pub fn format_progress(report: &FrameReport) -> String {
    let state = &report.state;
    format!(
        "frame {:>5}  samples {:>6}/{:<6}  inside {:>6}  π ≈ {}",
        report.frame,
        state.samples_done(),
        state.samples_target(),
        state.inside_count(),
        format_estimate(state),
    )
}

/// Estimate with its absolute error, or a dash before the first sample.
#[must_use]
pub fn format_estimate(state: &SimulationState) -> String {
    match (state.estimate(), state.absolute_error()) {
        (Some(estimate), Some(error)) => format!("{estimate:.6} (abs error: {error:.2e})"),
        _ => "—".to_string(),
    }
}

/// Multi-line summary of a finished run.
#[must_use]
pub fn format_summary(summary: &RunSummary) -> String {
    let state = &summary.state;
    let mut out = String::new();
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    out.push_str(&format!("Samples: {} / {}\n", state.samples_done(), state.samples_target()));
    out.push_str(&format!("Inside circle: {}\n", state.inside_count()));
    out.push_str(&format!("π ≈ {}\n", format_estimate(state)));
    out.push_str(&format!("Frames: {}\n", summary.frames));
    out.push_str(&format!("Seed: {}\n", summary.seed));
    out.push_str(&format!("Status: {}\n", summary.phase));
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    out
}

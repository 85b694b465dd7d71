//! CLI command handlers.

use std::path::Path;
use std::process::ExitCode;
use tracing::error;

use super::args::RunOptions;
use super::output::{format_progress, format_summary, print_help, print_version, RunSummary};
use super::{Args, Command};
use crate::config::EstimatorConfig;
use crate::engine::driver::FrameDriver;
use crate::error::EstimatorResult;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run(opts) => run_estimation(&opts),
        Command::Validate { config_path } => validate_config(&config_path),
        Command::Invalid { message } => {
            error!(%message, "invalid arguments");
            eprintln!("Error: {message}");
            eprintln!("Run 'mcpi help' for usage.");
            ExitCode::from(1)
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Merge the config file (if any) with command-line overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the merged config is
/// invalid.
pub fn resolve_config(opts: &RunOptions) -> EstimatorResult<EstimatorConfig> {
    let mut config = match &opts.config_path {
        Some(path) => EstimatorConfig::load(path)?,
        None => EstimatorConfig::default(),
    };

    if let Some(samples_target) = opts.samples_target {
        config.run.samples_target = samples_target;
    }
    if let Some(batch_size) = opts.batch_size {
        config.run.batch_size = batch_size;
    }
    if opts.seed.is_some() {
        config.run.seed = opts.seed;
    }
    if let Some(fps) = opts.fps {
        config.driver.fps = fps;
    }
    if opts.no_pace || opts.json {
        config.driver.paced = false;
    }

    config.check()?;
    Ok(config)
}

/// Run an estimation to completion and return its summary.
///
/// `on_frame` receives one progress line per frame.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn execute_run<F>(config: &EstimatorConfig, mut on_frame: F) -> EstimatorResult<RunSummary>
where
    F: FnMut(String),
{
    let mut driver = FrameDriver::from_config(config)?;
    driver.start()?;
    let state = driver.run_to_completion(|report| on_frame(format_progress(report)));
    Ok(RunSummary::new(driver.seed(), driver.frames(), state))
}

/// Run an estimation from CLI options.
#[must_use]
pub fn run_estimation(opts: &RunOptions) -> ExitCode {
    let result = resolve_config(opts).and_then(|config| {
        if opts.json {
            let summary = execute_run(&config, |_| {})?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            let summary = execute_run(&config, |line| println!("{line}"))?;
            println!("{}", format_summary(&summary));
        }
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Validate a configuration file.
#[must_use]
pub fn validate_config(path: &Path) -> ExitCode {
    println!("Validating: {}", path.display());

    match EstimatorConfig::load(path) {
        Ok(config) => {
            println!("✓ Configuration valid");
            println!("  samples_target: {}", config.run.samples_target);
            println!("  batch_size:     {}", config.run.batch_size);
            match config.run.seed {
                Some(seed) => println!("  seed:           {seed}"),
                None => println!("  seed:           (entropy)"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("✗ Configuration invalid");
            println!("  {e}");
            ExitCode::from(1)
        }
    }
}

//! mcpi CLI - Monte Carlo estimation of π
//!
//! Command-line host that drives the estimator frame by frame.

use mcpi::cli::{run_cli, Args};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose());
    run_cli(args)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "mcpi=debug" } else { "mcpi=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

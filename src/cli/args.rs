//! CLI argument parsing.
//!
//! Parsing takes any iterator of strings so it can be tested without a
//! process environment.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Options for the `run` command. Every field overrides the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Optional YAML configuration file.
    pub config_path: Option<PathBuf>,
    /// Target sample count override.
    pub samples_target: Option<u64>,
    /// Batch size override.
    pub batch_size: Option<u64>,
    /// Seed override.
    pub seed: Option<u64>,
    /// Frame rate override.
    pub fps: Option<u32>,
    /// Run frames back to back instead of pacing them.
    pub no_pace: bool,
    /// Print a JSON summary instead of progress lines.
    pub json: bool,
    /// Enable verbose output.
    pub verbose: bool,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run an estimation.
    Run(RunOptions),
    /// Validate a configuration file.
    Validate {
        /// Path to the YAML file.
        config_path: PathBuf,
    },
    /// Arguments that could not be parsed.
    Invalid {
        /// What was wrong with them.
        message: String,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Whether verbose logging was requested.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        matches!(&self.command, Command::Run(opts) if opts.verbose)
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(&args[2..]),
            "validate" => Self::parse_validate_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// Parse the 'run' command options.
    ///
    /// A missing or unparseable value makes the whole command invalid.
    fn parse_run_command(rest: &[String]) -> Command {
        Self::parse_run_options(rest)
            .map_or_else(|message| Command::Invalid { message }, Command::Run)
    }

    fn parse_run_options(rest: &[String]) -> Result<RunOptions, String> {
        let mut opts = RunOptions::default();

        let mut i = 0;
        while i < rest.len() {
            let value = rest.get(i + 1).map(String::as_str);
            match rest[i].as_str() {
                "--config" | "-c" => {
                    opts.config_path = value.map(PathBuf::from);
                    i += 2;
                }
                "--target" | "-n" => {
                    opts.samples_target = Some(parse_value("--target", value)?);
                    i += 2;
                }
                "--batch" | "-b" => {
                    opts.batch_size = Some(parse_value("--batch", value)?);
                    i += 2;
                }
                "--seed" => {
                    opts.seed = Some(parse_value("--seed", value)?);
                    i += 2;
                }
                "--fps" => {
                    opts.fps = Some(parse_value("--fps", value)?);
                    i += 2;
                }
                "--no-pace" => {
                    opts.no_pace = true;
                    i += 1;
                }
                "--json" => {
                    opts.json = true;
                    i += 1;
                }
                "-v" | "--verbose" => {
                    opts.verbose = true;
                    i += 1;
                }
                other => {
                    eprintln!("Ignoring unknown option: {other}");
                    i += 1;
                }
            }
        }

        Ok(opts)
    }

    /// Parse the 'validate' command arguments.
    fn parse_validate_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'validate' command requires a config path");
            return Command::Help;
        }

        Command::Validate {
            config_path: PathBuf::from(&args[2]),
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&str>) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("{flag} requires a value"))?;
    raw.parse()
        .map_err(|_| format!("invalid value for {flag}: {raw}"))
}

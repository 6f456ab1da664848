// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `brewkit`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "brewkit",
    version,
    about = "Run a Homebrew command, stream its output, cancel it with Ctrl-C.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// When omitted, `Brewkit.toml` is used if it exists, otherwise defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Path to the `brew` executable; overrides config and `BREWKIT_BREW_PATH`.
    #[arg(long, value_name = "PATH")]
    pub brew_path: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BREWKIT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Invoke brew without a subcommand, passing only the trailing arguments
    /// (e.g. `brewkit --bare -- --cache`).
    #[arg(long, conflicts_with_all = ["command", "package"])]
    pub bare: bool,

    /// The brew command, e.g. `search`, `install`, `outdated`.
    #[arg(value_name = "COMMAND", required_unless_present = "bare")]
    pub command: Option<String>,

    /// Formula the command applies to.
    #[arg(value_name = "PACKAGE")]
    pub package: Option<String>,

    /// Extra arguments passed to brew verbatim (after `--`).
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

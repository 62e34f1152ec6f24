// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::dag::names;

/// Command-line arguments for `litdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "litdag",
    version,
    about = "Generate runnable examples from literate tutorials and keep them fresh.",
    long_about = None
)]
pub struct CliArgs {
    /// Tasks to run, together with their prerequisites.
    ///
    /// Default: `default` (clean, generate-examples, integration).
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// If omitted, `Litdag.toml` in the current directory is used when it
    /// exists, and the built-in defaults otherwise.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LITDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task chain, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Requested targets, falling back to `default`.
    pub fn targets(&self) -> Vec<String> {
        if self.tasks.is_empty() {
            vec![names::DEFAULT.to_string()]
        } else {
            self.tasks.clone()
        }
    }
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

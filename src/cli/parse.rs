//! CLI parse: clap types for Weave. No behavior; definitions only.

use crate::output::Verbosity;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Weave CLI - compose small commands into workflows
#[derive(Parser, Debug)]
#[command(name = "weave")]
#[command(about = "Run and compose commands whose results are captured as references")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, default_value = ".", global = true)]
    pub project: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print only the result
    #[arg(long, short = 'q', global = true, conflicts_with_all = ["verbose", "stream", "verbosity"])]
    pub quiet: bool,

    /// Show progress, every reference and its metadata
    #[arg(long, short = 'v', global = true, conflicts_with_all = ["stream", "verbosity"])]
    pub verbose: bool,

    /// Emit output as it happens
    #[arg(long, global = true, conflicts_with = "verbosity")]
    pub stream: bool,

    /// Output level (quiet, summary, verbose, stream)
    #[arg(long, global = true)]
    pub verbosity: Option<Verbosity>,

    /// Keep references in memory instead of writing them to the output root
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Task name used for the run directory (default: the command name)
    #[arg(long, global = true)]
    pub task: Option<String>,

    /// Colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command by name
    Run {
        /// Command name (see `weave list`)
        name: String,

        /// Arguments passed to the command
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List built-in and project commands
    List,
}

impl Cli {
    /// Verbosity chosen explicitly on the command line, if any.
    pub fn verbosity_flag(&self) -> Option<Verbosity> {
        if self.quiet {
            Some(Verbosity::Quiet)
        } else if self.verbose {
            Some(Verbosity::Verbose)
        } else if self.stream {
            Some(Verbosity::Stream)
        } else {
            self.verbosity
        }
    }
}

//! Weave CLI Binary
//!
//! Command-line interface for the Weave command-composition engine.

use anyhow::Context as _;
use clap::Parser;
use std::process;
use tokio::runtime::Runtime;
use tracing::{error, info};
use weave::cli::{command_name, map_error, Cli, RunContext};
use weave::config::ConfigLoader;
use weave::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!(command = %command_name(&cli.command), "Weave CLI starting");

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    let context = match RunContext::new(cli.project.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing project: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(e.exit_code());
        }
    };

    let output = runtime.block_on(context.execute(&cli));
    for notice in &output.notices {
        eprintln!("{}", notice);
    }
    if !output.text.is_empty() {
        println!("{}", output.text);
    }
    if let Some(e) = &output.error {
        error!(command = %command_name(&cli.command), "Command failed: {}", e);
        process::exit(output.exit_code());
    }
    info!("Command completed successfully");
}

/// Commands run one at a time, so a current-thread runtime is enough.
fn build_runtime() -> anyhow::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default(),
        None => ConfigLoader::load(&cli.project)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default(),
    };

    if cli.quiet {
        config.enabled = false;
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_logging_config_default() {
        let temp = tempfile::tempdir().unwrap();
        let project = temp.path().to_string_lossy();
        let cli = Cli::try_parse_from(["weave", "--project", project.as_ref(), "list"]).unwrap();
        let config = build_logging_config(&cli);
        assert!(config.enabled, "default should have logging enabled");
        assert_eq!(config.output, "stderr", "default output should be stderr");
    }

    #[test]
    fn test_build_logging_config_quiet() {
        let cli = Cli::try_parse_from(["weave", "--quiet", "list"]).unwrap();
        let config = build_logging_config(&cli);
        assert!(!config.enabled, "quiet should disable logging");
    }

    #[test]
    fn test_build_logging_config_flags_override_file() {
        let temp = tempfile::tempdir().unwrap();
        let config_file = temp.path().join("weave.toml");
        std::fs::write(&config_file, "[logging]\nlevel = \"info\"\nformat = \"json\"\n").unwrap();
        let config_arg = config_file.to_string_lossy();

        let cli = Cli::try_parse_from([
            "weave",
            "--config",
            config_arg.as_ref(),
            "--log-level",
            "debug",
            "list",
        ])
        .unwrap();
        let config = build_logging_config(&cli);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "json");
    }
}

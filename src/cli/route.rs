//! CLI route: single route table and run context. Dispatches to the command engine and presentation.

use crate::cli::map_error;
use crate::cli::parse::{Cli, Commands};
use crate::cli::presentation::{format_command_list, format_load_failures};
use crate::command::{CommandLoader, CommandRouter, LoadReport};
use crate::config::{ConfigLoader, WeaveConfig};
use crate::context::{EphemeralContext, PersistedContext};
use crate::error::ApiError;
use crate::output::{create_output_builder, OutputOptions, Verbosity};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What one CLI invocation produced.
#[derive(Debug, Default)]
pub struct RouteOutput {
    /// Rendered output for stdout
    pub text: String,
    /// Diagnostics for stderr
    pub notices: Vec<String>,
    /// The failure that ended the invocation, if any
    pub error: Option<ApiError>,
}

impl RouteOutput {
    pub fn exit_code(&self) -> i32 {
        self.error.as_ref().map(ApiError::exit_code).unwrap_or(0)
    }
}

/// Per-invocation switches taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub verbosity: Option<Verbosity>,
    pub ephemeral: bool,
    pub task: Option<String>,
    pub color: bool,
}

impl From<&Cli> for RunOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            verbosity: cli.verbosity_flag(),
            ephemeral: cli.ephemeral,
            task: cli.task.clone(),
            color: cli.color,
        }
    }
}

/// Runtime context for CLI execution: project root, merged config and the command table.
pub struct RunContext {
    project_root: PathBuf,
    config: WeaveConfig,
    router: CommandRouter,
    load_report: LoadReport,
}

impl RunContext {
    /// Create run context from project root and optional config path. Uses ConfigLoader only.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let project_root = dunce::canonicalize(&project_root).map_err(|e| {
            ApiError::ConfigError(format!(
                "Project root {} is not accessible: {}",
                project_root.display(),
                e
            ))
        })?;
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&project_root)?,
        };
        Self::with_config(project_root, config)
    }

    /// Build from an already merged configuration.
    pub fn with_config(project_root: PathBuf, config: WeaveConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;

        let mut router = CommandRouter::with_builtins();
        let loader = CommandLoader::new(project_root.join(&config.commands.dir));
        let load_report = loader.load_into(&mut router, &config.agents);
        debug!(
            commands = router.names().len(),
            failed = load_report.failures.len(),
            "Command table ready"
        );

        Ok(Self {
            project_root,
            config,
            router,
            load_report,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &WeaveConfig {
        &self.config
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Execute a CLI command via the single route table.
    pub async fn execute(&self, cli: &Cli) -> RouteOutput {
        let mut output = match &cli.command {
            Commands::Run { name, args } => self.run(name, args, &RunOptions::from(cli)).await,
            Commands::List => self.list(),
        };
        let mut notices = format_load_failures(&self.load_report.failures);
        notices.append(&mut output.notices);
        output.notices = notices;
        output
    }

    /// Run `name` once, rendering through the builder for the resolved verbosity.
    pub async fn run(&self, name: &str, args: &[String], options: &RunOptions) -> RouteOutput {
        let configured = match self.config.output.verbosity() {
            Ok(level) => Some(level),
            Err(e) => {
                warn!("Ignoring configured verbosity: {}", e);
                None
            }
        };
        let command_default = self.router.get(name).and_then(|c| c.default_verbosity());
        let verbosity = Verbosity::resolve(options.verbosity, command_default, configured);
        let mut builder = create_output_builder(
            verbosity,
            OutputOptions {
                color: options.color || self.config.output.color,
            },
        );
        info!(command = name, verbosity = %verbosity, "Dispatching command");

        let mut route = RouteOutput::default();
        if options.ephemeral || !self.config.output.persist {
            let context = EphemeralContext::new(&self.project_root);
            route.error = self
                .router
                .dispatch(name, args, &context, builder.as_mut())
                .await
                .err();
        } else {
            let task = options.task.as_deref().unwrap_or(name);
            let context =
                match PersistedContext::new(&self.project_root, &self.config.output.root, task) {
                    Ok(context) => context,
                    Err(e) => {
                        route.notices.push(map_error(&e));
                        route.error = Some(e);
                        return route;
                    }
                };
            let result = self
                .router
                .dispatch(name, args, &context, builder.as_mut())
                .await;
            route.error = match result {
                Ok(_) => match context.write_manifest().await {
                    Ok(path) => {
                        debug!(manifest = ?path, "Run manifest written");
                        None
                    }
                    Err(e) => {
                        let e = ApiError::from(e);
                        route.notices.push(map_error(&e));
                        Some(e)
                    }
                },
                Err(e) => Some(e),
            };
        }
        route.text = builder.build();
        route
    }

    pub fn list(&self) -> RouteOutput {
        RouteOutput {
            text: format_command_list(&self.router),
            ..RouteOutput::default()
        }
    }
}

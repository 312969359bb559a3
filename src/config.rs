//! Configuration System
//!
//! Layered configuration for the command engine: where persisted runs are written, the
//! default verbosity, where user commands are discovered, which external agents may be
//! invoked, and logging.

use crate::logging::LoggingConfig;
use crate::output::Verbosity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub use crate::command::builtin::AgentConfig;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::project_file::PROJECT_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaveConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub commands: CommandsConfig,

    /// External agent executables, by name
    #[serde(default)]
    pub agents: HashMap<String, AgentConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for persisted runs, relative to the project root
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// Verbosity used when neither the caller nor the command chooses one
    #[serde(default = "default_verbosity")]
    pub verbosity: String,

    #[serde(default)]
    pub color: bool,

    /// Write References to disk; false runs every invocation in memory
    #[serde(default = "default_true")]
    pub persist: bool,
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

fn default_verbosity() -> String {
    Verbosity::Summary.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            verbosity: default_verbosity(),
            color: false,
            persist: true,
        }
    }
}

impl OutputConfig {
    pub fn verbosity(&self) -> Result<Verbosity, String> {
        self.verbosity.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Directory scanned for command manifests, relative to the project root
    #[serde(default = "default_commands_dir")]
    pub dir: PathBuf,
}

fn default_commands_dir() -> PathBuf {
    PathBuf::from(".weave/commands")
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            dir: default_commands_dir(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Output(String),
    Agent(String, String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Output(msg) => write!(f, "Output: {}", msg),
            ValidationError::Agent(name, msg) => write!(f, "Agent '{}': {}", name, msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl WeaveConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.output.verbosity() {
            errors.push(ValidationError::Output(e));
        }
        if self.output.root.as_os_str().is_empty() {
            errors.push(ValidationError::Output("root cannot be empty".to_string()));
        }

        let mut names: Vec<&String> = self.agents.keys().collect();
        names.sort();
        for name in names {
            if let Err(e) = self.agents[name].validate() {
                errors.push(ValidationError::Agent(name.clone(), e));
            }
        }

        if !["json", "text"].contains(&self.logging.format.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "unknown format '{}'",
                self.logging.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

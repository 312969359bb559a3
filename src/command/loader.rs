//! Command loader
//!
//! Discovers user-declared commands in a project directory. Every `*.toml` file declares
//! exactly one command; its `kind` selects the factory that builds it. A file that fails
//! to read, parse or build is reported on its own and never stops the others from loading.

use crate::command::builtin::{AgentConfig, AliasCommand, ProcessCommand};
use crate::command::{Command, CommandInfo, CommandRouter};
use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// One command declaration read from a manifest file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandManifest {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub verbosity: Option<String>,
    /// Kind-specific keys, decoded by the factory.
    #[serde(flatten)]
    pub params: toml::Table,
}

impl CommandManifest {
    pub fn from_toml(content: &str) -> Result<Self, ApiError> {
        let manifest: Self = toml::from_str(content)
            .map_err(|e| ApiError::Validation(format!("Invalid command manifest: {}", e)))?;
        if manifest.name.trim().is_empty() || manifest.name.contains(char::is_whitespace) {
            return Err(ApiError::Validation(format!(
                "Invalid command name '{}'",
                manifest.name
            )));
        }
        Ok(manifest)
    }

    /// Decode the kind-specific keys into `T`.
    pub fn params<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        toml::Value::Table(self.params.clone())
            .try_into()
            .map_err(|e| {
                ApiError::Validation(format!(
                    "Invalid '{}' parameters for command '{}': {}",
                    self.kind, self.name, e
                ))
            })
    }

    pub fn info(&self) -> Result<CommandInfo, ApiError> {
        let mut info = CommandInfo::new(
            self.name.clone(),
            self.description.clone().unwrap_or_default(),
        );
        info.verbosity = match &self.verbosity {
            Some(level) => Some(level.parse().map_err(ApiError::Validation)?),
            None => None,
        };
        Ok(info)
    }
}

/// What a factory may consult while building a command.
pub struct FactoryContext<'a> {
    /// Commands registered so far, built-ins and earlier manifests included.
    pub router: &'a CommandRouter,
    pub agents: &'a HashMap<String, AgentConfig>,
}

pub type CommandFactory =
    fn(&CommandManifest, &FactoryContext<'_>) -> Result<Arc<dyn Command>, ApiError>;

/// Manifest kind → factory table.
#[derive(Default, Clone)]
pub struct CommandFactories {
    factories: BTreeMap<String, CommandFactory>,
}

impl CommandFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the `alias` and `process` kinds.
    pub fn with_builtin_kinds() -> Self {
        let mut factories = Self::new();
        factories.register("alias", build_alias);
        factories.register("process", build_process);
        factories
    }

    pub fn register(&mut self, kind: impl Into<String>, factory: CommandFactory) {
        self.factories.insert(kind.into(), factory);
    }

    pub fn get(&self, kind: &str) -> Option<CommandFactory> {
        self.factories.get(kind).copied()
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AliasParams {
    target: String,
    #[serde(default)]
    args: Vec<String>,
}

fn build_alias(
    manifest: &CommandManifest,
    context: &FactoryContext<'_>,
) -> Result<Arc<dyn Command>, ApiError> {
    let params: AliasParams = manifest.params()?;
    let target = context.router.get(&params.target).ok_or_else(|| {
        ApiError::ConfigError(format!(
            "Alias '{}' targets unknown command '{}'",
            manifest.name, params.target
        ))
    })?;
    Ok(Arc::new(AliasCommand::new(manifest.info()?, target, params.args)))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProcessParams {
    agent: String,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

fn build_process(
    manifest: &CommandManifest,
    context: &FactoryContext<'_>,
) -> Result<Arc<dyn Command>, ApiError> {
    let params: ProcessParams = manifest.params()?;
    let agent = context.agents.get(&params.agent).ok_or_else(|| {
        ApiError::ConfigError(format!(
            "Command '{}' uses agent '{}' which is not configured",
            manifest.name, params.agent
        ))
    })?;
    agent
        .validate()
        .map_err(|e| ApiError::ConfigError(format!("Agent '{}': {}", params.agent, e)))?;

    let mut command = ProcessCommand::new(manifest.info()?, params.agent, agent.clone());
    if let Some(prompt) = params.prompt {
        command = command.with_prompt(prompt);
    }
    if let Some(token) = params.token {
        command = command.with_token(token);
    }
    Ok(Arc::new(command))
}

/// A manifest that could not be turned into a command.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: ApiError,
}

/// Outcome of one loader pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Names registered, in load order
    pub loaded: Vec<String>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, path: PathBuf, cause: ApiError) {
        error!(path = %path.display(), "Failed to load command: {}", cause);
        self.failures.push(LoadFailure {
            error: ApiError::CommandLoad {
                path: path.clone(),
                message: cause.to_string(),
            },
            path,
        });
    }
}

pub struct CommandLoader {
    dir: PathBuf,
    factories: CommandFactories,
}

impl CommandLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_factories(dir, CommandFactories::with_builtin_kinds())
    }

    pub fn with_factories(dir: impl Into<PathBuf>, factories: CommandFactories) -> Self {
        Self {
            dir: dir.into(),
            factories,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Register every manifest under the directory with `router`.
    ///
    /// Files load in path order so an alias may target a command declared in an earlier
    /// file. A missing directory yields an empty report.
    pub fn load_into(
        &self,
        router: &mut CommandRouter,
        agents: &HashMap<String, AgentConfig>,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        if !self.dir.is_dir() {
            debug!(dir = %self.dir.display(), "Command directory not present");
            return report;
        }

        let mut seen = HashSet::new();
        for entry in WalkDir::new(&self.dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.dir.clone());
                    report.fail(path, ApiError::Execution(e.to_string()));
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension() != Some(OsStr::new("toml")) {
                continue;
            }

            match self.load_file(path, router, agents, &seen) {
                Ok(command) => {
                    let name = command.name().to_string();
                    debug!(command = %name, path = %path.display(), "Loaded command");
                    router.register(command);
                    seen.insert(name.clone());
                    report.loaded.push(name);
                }
                Err(e) => report.fail(path.to_path_buf(), e),
            }
        }

        info!(
            dir = %self.dir.display(),
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            "Command directory scanned"
        );
        report
    }

    fn load_file(
        &self,
        path: &Path,
        router: &CommandRouter,
        agents: &HashMap<String, AgentConfig>,
        seen: &HashSet<String>,
    ) -> Result<Arc<dyn Command>, ApiError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Execution(format!("Failed to read manifest: {}", e)))?;
        let manifest = CommandManifest::from_toml(&content)?;

        if seen.contains(&manifest.name) {
            return Err(ApiError::Validation(format!(
                "Duplicate command name '{}'",
                manifest.name
            )));
        }
        if router.contains(&manifest.name) {
            return Err(ApiError::Validation(format!(
                "Command name '{}' is already registered",
                manifest.name
            )));
        }

        let factory = self.factories.get(&manifest.kind).ok_or_else(|| {
            ApiError::Validation(format!(
                "Unknown command kind '{}' (expected one of: {})",
                manifest.kind,
                self.factories.kinds().join(", ")
            ))
        })?;
        factory(&manifest, &FactoryContext { router, agents })
    }
}

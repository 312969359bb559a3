use super::merge::merge_policy;
use super::sources::{global_file, project_file};
use super::WeaveConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Assembles a [`WeaveConfig`] from every configuration layer.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `project_root`.
    ///
    /// Layers, lowest precedence first: built-in defaults, the global file, the project's
    /// `weave.toml`, then `WEAVE__*` environment variables.
    pub fn load(project_root: &Path) -> Result<WeaveConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = project_file::add_to_builder(builder, project_root)?;
        let builder = merge_policy::add_environment(builder);

        let config: WeaveConfig = builder.build()?.try_deserialize()?;
        debug!(
            project_root = %project_root.display(),
            agents = config.agents.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load one explicit file over the built-in defaults.
    pub fn load_from_file(path: &Path) -> Result<WeaveConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    pub fn project_config_path(project_root: &Path) -> PathBuf {
        project_file::project_config_path(project_root)
    }
}

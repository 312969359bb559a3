//! Project config file source: weave.toml at the project root.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_FILE: &str = "weave.toml";

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_FILE)
}

/// Add the project config file to builder. Project settings override global ones.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    project_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = project_config_path(project_root);
    if path.is_file() {
        Ok(builder.add_source(File::from(path).required(false)))
    } else {
        Ok(builder)
    }
}

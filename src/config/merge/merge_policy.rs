//! Merge rules: defaults, override order, conflict handling.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("output.root", "output")?
        .set_default("output.verbosity", "summary")?
        .set_default("output.color", false)?
        .set_default("output.persist", true)?
        .set_default("commands.dir", ".weave/commands")
}

/// Environment overrides last: `WEAVE__OUTPUT__ROOT=out` sets `output.root`.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("WEAVE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}

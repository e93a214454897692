//! Lowest-precedence layer: the built-in defaults.

use crate::config::SwarmConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder seeded with `SwarmConfig::default()`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&SwarmConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}

//! Per-user config file under the platform config directory.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::PathBuf;

/// `<config dir>/patrol-swarm/config.toml`, if the platform has one
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "patrol-swarm", "patrol-swarm")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the user config file when present; a missing file is not an error.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match user_config_path() {
        Some(path) => Ok(builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        )),
        None => Ok(builder),
    }
}

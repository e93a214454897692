//! MergeService: orchestrates sources, applies merge policy, deserializes to SwarmConfig.

use crate::config::sources::{environment, user_file};
use crate::config::SwarmConfig;
use config::{ConfigError, File, FileFormat};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> user config file -> environment (highest).
    pub fn load() -> Result<SwarmConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = user_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Precedence: defaults (lowest) -> `path` -> environment (highest).
    pub fn load_from_file(path: &Path) -> Result<SwarmConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(true),
        );
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}

//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::SwarmConfig;
use crate::error::SwarmError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the user config file (if any) and environment.
    pub fn load() -> Result<SwarmConfig, SwarmError> {
        Self::finish(MergeService::load()?)
    }

    /// Load from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<SwarmConfig, SwarmError> {
        Self::finish(MergeService::load_from_file(path)?)
    }

    /// Explicit file when given, standard sources otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<SwarmConfig, SwarmError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Create default configuration.
    pub fn default() -> SwarmConfig {
        SwarmConfig::default()
    }

    fn finish(config: SwarmConfig) -> Result<SwarmConfig, SwarmError> {
        config.validate()?;
        Ok(config)
    }
}

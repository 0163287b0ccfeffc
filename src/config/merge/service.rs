//! MergeService: orchestrates sources and deserializes to BridgeConfig.

use crate::config::paths::xdg_root;
use crate::config::sources::{environment, file};
use crate::config::BridgeConfig;
use config::{Config, ConfigError};
use std::path::Path;
use tracing::debug;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the global file (if present) and the environment.
    /// Precedence: defaults (lowest) -> global file -> environment (highest).
    pub fn load() -> Result<BridgeConfig, ConfigError> {
        let builder = Config::builder();
        let builder = match xdg_root::default_config_file() {
            Some(path) => {
                debug!(path = %path.display(), "Looking for global config");
                file::add_to_builder(builder, &path, false)?
            }
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<BridgeConfig, ConfigError> {
        let builder = file::add_to_builder(Config::builder(), path, true)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}

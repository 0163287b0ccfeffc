//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::BridgeConfig;
use crate::error::AdapterError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<BridgeConfig, AdapterError> {
        Ok(MergeService::load()?)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<BridgeConfig, AdapterError> {
        Ok(MergeService::load_from_file(path)?)
    }

    /// Load from `path` when given, otherwise from the standard locations.
    pub fn load_or_default(path: Option<&Path>) -> Result<BridgeConfig, AdapterError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}

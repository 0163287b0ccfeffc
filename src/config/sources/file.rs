//! TOML file source.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

/// Add a TOML file to the builder. A missing optional file is skipped.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let name = path.to_str().ok_or_else(|| {
        ConfigError::Message(format!("Config path is not valid UTF-8: {:?}", path))
    })?;
    Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
}

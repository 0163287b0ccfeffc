//! Environment variable source: TWITCH_BRIDGE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub(crate) const ENV_PREFIX: &str = "TWITCH_BRIDGE";

/// Add environment variable overlay to builder.
///
/// `TWITCH_BRIDGE__CREDENTIALS__CLIENT_ID` sets `credentials.client_id`.
/// Values stay strings so numeric user ids keep their form.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__"),
    ))
}

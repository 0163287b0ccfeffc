//! XDG Base Directory lookup for the bridge's global config file.

use std::path::PathBuf;

const APP_DIR: &str = "twitch-bridge";

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Some(PathBuf::from(xdg_config_home));
        }
    }

    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config"))
}

/// `$XDG_CONFIG_HOME/twitch-bridge/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    config_home().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

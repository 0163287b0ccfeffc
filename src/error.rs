//! Error types for the adapter.
//!
//! Configuration problems never escape `link_attribute`; they surface as a
//! connection status or a log entry. Remote call failures propagate to the
//! caller of `attribute_write`.

use thiserror::Error;

/// Failure of a call against the remote platform.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP {status} from {endpoint}: {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

/// Adapter error taxonomy
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote call failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("Subscription failed: {0}")]
    Subscription(String),

    #[error("Connection could not be established: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for AdapterError {
    fn from(err: config::ConfigError) -> Self {
        AdapterError::Config(err.to_string())
    }
}

impl AdapterError {
    /// Whether this error is a configuration problem rather than a runtime failure.
    pub fn is_config(&self) -> bool {
        matches!(self, AdapterError::Config(_))
    }
}

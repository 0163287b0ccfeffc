//! Helix REST request facade.
//!
//! Wraps an async `reqwest` client behind the blocking `HelixApi` trait by
//! driving each request on a runtime owned by the client. Calls must come
//! from threads that are not themselves running inside a tokio runtime.

use super::{CreatedClip, HelixApi, HelixUser};
use crate::error::RemoteError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_HELIX_URL: &str = "https://api.twitch.tv/helix";

/// Helix endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelixConfig {
    /// Base URL of the Helix API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Honour HTTP(S)_PROXY environment settings
    #[serde(default = "default_true")]
    pub system_proxy: bool,
}

fn default_base_url() -> String {
    DEFAULT_HELIX_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

impl Default for HelixConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            system_proxy: default_true(),
        }
    }
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

/// Blocking Helix client authenticated with an app client id and user token.
pub struct HelixClient {
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
}

impl HelixClient {
    pub fn new(
        config: &HelixConfig,
        client_id: &str,
        access_token: &str,
    ) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Client-Id",
            HeaderValue::from_str(client_id)
                .map_err(|e| RemoteError::Transport(format!("Invalid client id header: {}", e)))?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|e| RemoteError::Transport(format!("Invalid access token header: {}", e)))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms));
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RemoteError::Transport(format!("Failed to start HTTP runtime: {}", e)))?;

        Ok(Self {
            http,
            runtime,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, RemoteError> {
        self.runtime.block_on(async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            debug!(endpoint, status = status.as_u16(), "Helix response");

            if !status.is_success() {
                return Err(RemoteError::Http {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }

            let envelope: DataEnvelope<T> = serde_json::from_str(&body)
                .map_err(|e| RemoteError::Decode(format!("{}: {}", endpoint, e)))?;
            Ok(envelope.data)
        })
    }
}

impl HelixApi for HelixClient {
    fn get_users(&self, ids: &[String]) -> Result<Vec<HelixUser>, RemoteError> {
        let query: Vec<(&str, &str)> = ids.iter().map(|id| ("id", id.as_str())).collect();
        let request = self
            .http
            .get(format!("{}/users", self.base_url))
            .query(&query);
        self.execute("/users", request)
    }

    fn create_clip(
        &self,
        broadcaster_id: &str,
        has_delay: bool,
    ) -> Result<Vec<CreatedClip>, RemoteError> {
        let request = self
            .http
            .post(format!("{}/clips", self.base_url))
            .query(&[
                ("broadcaster_id", broadcaster_id),
                ("has_delay", if has_delay { "true" } else { "false" }),
            ]);
        self.execute("/clips", request)
    }
}

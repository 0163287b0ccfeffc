//! Agent credentials and subject identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials and identity sourced from the agent's own attributes.
///
/// Blank strings are treated the same as missing values.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCredentials {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Subject user id, used as broadcaster id for Helix calls
    #[serde(default)]
    pub user_id: Option<String>,
    /// Subject username, used as the chat channel name
    #[serde(default)]
    pub username: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AgentCredentials {
    pub fn client_id(&self) -> Option<&str> {
        present(&self.client_id)
    }

    pub fn client_secret(&self) -> Option<&str> {
        present(&self.client_secret)
    }

    pub fn access_token(&self) -> Option<&str> {
        present(&self.access_token)
    }

    pub fn refresh_token(&self) -> Option<&str> {
        present(&self.refresh_token)
    }

    pub fn user_id(&self) -> Option<&str> {
        present(&self.user_id)
    }

    pub fn username(&self) -> Option<&str> {
        present(&self.username)
    }

    /// Client id and secret are both present.
    pub fn has_client_credentials(&self) -> bool {
        self.client_id().is_some() && self.client_secret().is_some()
    }

    pub fn with_client(mut self, client_id: &str, client_secret: &str) -> Self {
        self.client_id = Some(client_id.to_string());
        self.client_secret = Some(client_secret.to_string());
        self
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn with_user_id(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }
}

fn redact(value: &Option<String>) -> &'static str {
    if present(value).is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for AgentCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .finish()
    }
}

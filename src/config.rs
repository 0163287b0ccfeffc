//! Configuration Management
//!
//! Layered configuration for the bridge binary: built-in defaults, then an
//! optional TOML file, then `TWITCH_BRIDGE__*` environment variables.

mod facade;

mod merge {
    pub(crate) mod service;
}

mod paths {
    pub(crate) mod xdg_root;
}

mod sources {
    pub(crate) mod environment;
    pub(crate) mod file;
}

pub use facade::ConfigLoader;
pub use paths::xdg_root::{config_home, default_config_file};

use crate::command::Command;
use crate::credentials::AgentCredentials;
use crate::link::AgentLink;
use crate::logging::LoggingConfig;
use crate::platform::HelixConfig;
use crate::types::AttributeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Top-level bridge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub credentials: AgentCredentials,

    #[serde(default)]
    pub helix: HelixConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Attribute links declared for the binary
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

/// One declared attribute link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub entity_id: String,
    pub attribute: String,

    #[serde(default)]
    pub command: Option<Command>,

    #[serde(default, alias = "polling_attribute")]
    pub output_attribute: Option<String>,
}

impl LinkConfig {
    pub fn attribute_ref(&self) -> AttributeRef {
        AttributeRef::new(self.entity_id.clone(), self.attribute.clone())
    }

    pub fn link(&self) -> AgentLink {
        AgentLink {
            command: self.command,
            output_attribute: self.output_attribute.clone(),
        }
    }
}

/// Problems found by [`BridgeConfig::validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl BridgeConfig {
    /// Check credentials and declared links.
    ///
    /// Errors prevent the bridge from doing anything useful; warnings flag
    /// links that will end up inert.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let creds = &self.credentials;

        if creds.client_id().is_none() {
            report.errors.push("credentials.client_id is not set".to_string());
        }
        if creds.client_secret().is_none() {
            report
                .errors
                .push("credentials.client_secret is not set".to_string());
        }
        if creds.access_token().is_none() {
            report.warnings.push(
                "credentials.access_token is not set; no connection will be made".to_string(),
            );
        }
        if self.helix.base_url.trim().is_empty() {
            report.errors.push("helix.base_url is empty".to_string());
        }

        let mut seen = HashSet::new();
        for (index, link) in self.links.iter().enumerate() {
            let label = format!("links[{}] ({}:{})", index, link.entity_id, link.attribute);
            if link.entity_id.trim().is_empty() || link.attribute.trim().is_empty() {
                report
                    .errors
                    .push(format!("{}: entity_id and attribute are required", label));
                continue;
            }
            if !seen.insert(link.attribute_ref()) {
                report
                    .warnings
                    .push(format!("{}: declared more than once; last one wins", label));
            }
            let Some(command) = link.command else {
                report
                    .warnings
                    .push(format!("{}: no command; the link will be inert", label));
                continue;
            };
            if let Some(identity) = command.spec().requires {
                if identity.resolve(creds).is_none() {
                    report.warnings.push(format!(
                        "{}: {} needs credentials.{}; the link will be inert",
                        label,
                        command,
                        identity.field_name()
                    ));
                }
            }
            if link.output_attribute.as_deref() == Some(link.attribute.as_str()) {
                report.warnings.push(format!(
                    "{}: output_attribute names the linked attribute itself",
                    label
                ));
            }
        }

        report
    }

    /// Find the declared link for an attribute. Later declarations win.
    pub fn find_link(&self, entity_id: &str, attribute: &str) -> Option<&LinkConfig> {
        self.links
            .iter()
            .rev()
            .find(|l| l.entity_id == entity_id && l.attribute == attribute)
    }
}

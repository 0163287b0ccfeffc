//! Per-attribute link configuration.

use crate::command::Command;
use serde::{Deserialize, Serialize};

/// AgentLink: declares what an attribute is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentLink {
    /// Command the attribute is bound to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,

    /// Attribute on the same entity that receives produced values.
    /// When unset, values are written to the linked attribute itself.
    #[serde(
        default,
        alias = "pollingAttribute",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_attribute: Option<String>,
}

impl AgentLink {
    pub fn new(command: Command) -> Self {
        Self {
            command: Some(command),
            output_attribute: None,
        }
    }

    pub fn with_output_attribute(mut self, name: impl Into<String>) -> Self {
        self.output_attribute = Some(name.into());
        self
    }

    /// Output override, ignoring blank names.
    pub fn output_attribute(&self) -> Option<&str> {
        self.output_attribute
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn has_output_override(&self) -> bool {
        self.output_attribute().is_some()
    }
}

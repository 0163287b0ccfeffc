//! Core types shared by the router, registry and protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value carried into and out of the attribute store.
pub type AttributeValue = serde_json::Value;

/// Milliseconds since the Unix epoch, as read from the adapter clock.
pub type Timestamp = i64;

/// AttributeRef: (entity id, attribute name) identifying one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeRef {
    pub entity_id: String,
    pub name: String,
}

impl AttributeRef {
    pub fn new(entity_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            name: name.into(),
        }
    }

    /// Reference to another attribute on the same entity.
    pub fn sibling(&self, name: impl Into<String>) -> Self {
        Self::new(self.entity_id.clone(), name)
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_id, self.name)
    }
}

/// AttributeEvent: a value written to an attribute at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEvent {
    #[serde(rename = "ref")]
    pub attribute_ref: AttributeRef,
    pub value: AttributeValue,
    pub timestamp: Timestamp,
}

impl AttributeEvent {
    pub fn new(attribute_ref: AttributeRef, value: AttributeValue, timestamp: Timestamp) -> Self {
        Self {
            attribute_ref,
            value,
            timestamp,
        }
    }
}

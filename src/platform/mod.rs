//! Remote platform facades.
//!
//! The adapter consumes three capability surfaces from a connection: a
//! request facade for synchronous Helix calls, an event stream, and chat
//! channel membership. Wire framing and the authentication handshake live
//! behind these seams.

pub mod chat;
pub mod events;
pub mod helix;
pub mod hub;
pub mod memory;

use crate::error::RemoteError;
use serde::{Deserialize, Serialize};

pub use chat::ChannelRoster;
pub use events::{ChannelMessageEvent, ChatMessage, EventChannel, EventKind, PlatformEvent};
pub use helix::{HelixClient, HelixConfig, DEFAULT_HELIX_URL};
pub use hub::{EventHandler, EventHub, Subscription};

/// A Helix user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelixUser {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(default, rename = "type")]
    pub user_type: String,
    #[serde(default)]
    pub broadcaster_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub offline_image_url: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A clip created through Helix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedClip {
    pub id: String,
    pub edit_url: String,
}

/// Request facade: synchronous typed calls keyed by subject identity.
///
/// Calls block for network latency.
pub trait HelixApi: Send + Sync {
    fn get_users(&self, ids: &[String]) -> Result<Vec<HelixUser>, RemoteError>;

    fn create_clip(
        &self,
        broadcaster_id: &str,
        has_delay: bool,
    ) -> Result<Vec<CreatedClip>, RemoteError>;
}

/// Chat channel membership facade.
pub trait ChatChannels: Send + Sync {
    fn is_channel_joined(&self, channel: &str) -> bool;

    /// Join a channel. May block for the join handshake.
    fn join_channel(&self, channel: &str) -> Result<(), RemoteError>;
}

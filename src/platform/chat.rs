//! Chat channel membership bookkeeping.

use super::ChatChannels;
use crate::error::RemoteError;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use tracing::info;

/// Set of joined chat channels.
///
/// The chat transport reads `joined_channels` to know which channels to
/// stay connected to. Channel names are case-insensitive.
#[derive(Default)]
pub struct ChannelRoster {
    channels: RwLock<BTreeSet<String>>,
}

impl ChannelRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn joined_channels(&self) -> Vec<String> {
        self.channels.read().iter().cloned().collect()
    }
}

fn normalize(channel: &str) -> String {
    channel.trim().trim_start_matches('#').to_lowercase()
}

impl ChatChannels for ChannelRoster {
    fn is_channel_joined(&self, channel: &str) -> bool {
        self.channels.read().contains(&normalize(channel))
    }

    fn join_channel(&self, channel: &str) -> Result<(), RemoteError> {
        let name = normalize(channel);
        if name.is_empty() {
            return Err(RemoteError::NotFound("empty chat channel name".to_string()));
        }
        if self.channels.write().insert(name.clone()) {
            info!(channel = %name, "Joined chat channel");
        }
        Ok(())
    }
}

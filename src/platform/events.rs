//! Event types delivered by the platform event stream.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Class of event the event stream can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ChannelMessage,
    ChannelFollow,
    ChannelSubscribe,
    ChannelCheer,
    ChannelBan,
    ChannelRaid,
    ChannelPointsRewardCreated,
    ChannelPointsRedemption,
    HypeTrainApproaching,
    HypeTrainStart,
    HypeTrainLevelUp,
    HypeTrainEnd,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ChannelMessage => "channel_message",
            EventKind::ChannelFollow => "channel_follow",
            EventKind::ChannelSubscribe => "channel_subscribe",
            EventKind::ChannelCheer => "channel_cheer",
            EventKind::ChannelBan => "channel_ban",
            EventKind::ChannelRaid => "channel_raid",
            EventKind::ChannelPointsRewardCreated => "channel_points_reward_created",
            EventKind::ChannelPointsRedemption => "channel_points_redemption",
            EventKind::HypeTrainApproaching => "hype_train_approaching",
            EventKind::HypeTrainStart => "hype_train_start",
            EventKind::HypeTrainLevelUp => "hype_train_level_up",
            EventKind::HypeTrainEnd => "hype_train_end",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event received from the platform, with its raw JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformEvent {
    pub kind: EventKind,
    pub payload: serde_json::Value,
}

impl PlatformEvent {
    pub fn new(kind: EventKind, payload: serde_json::Value) -> Self {
        Self { kind, payload }
    }
}

/// Channel a chat message was posted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChannel {
    pub id: String,
    pub name: String,
}

/// Raw chat message event as produced by the chat transport.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelMessageEvent {
    pub channel: EventChannel,
    pub message: String,
    #[serde(default)]
    pub badges: HashMap<String, String>,
}

/// Chat message as written into the attribute store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub badges: HashMap<String, String>,
    pub channel: EventChannel,
    pub message: String,
}

impl From<ChannelMessageEvent> for ChatMessage {
    fn from(event: ChannelMessageEvent) -> Self {
        Self {
            badges: event.badges,
            channel: event.channel,
            message: event.message,
        }
    }
}

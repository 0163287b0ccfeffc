//! PUSH registrations: standing subscriptions opened at link time.

use super::table::{LinkContext, Registration};
use crate::error::AdapterError;
use crate::platform::{ChannelMessageEvent, ChatMessage, PlatformEvent};
use std::sync::Arc;
use tracing::{info, warn};

/// Forward every event of the command's kind as-is.
pub(super) fn forward_events(ctx: &LinkContext<'_>) -> Result<Registration, AdapterError> {
    let kind = ctx.event_kind()?;
    let router = ctx.router.clone();
    let link = ctx.link.clone();
    let origin = ctx.origin.clone();

    info!(attribute = %origin, kind = %kind, "Subscribing to events");
    let subscription = ctx.connection.events().subscribe(
        kind,
        Arc::new(move |event: &PlatformEvent| {
            router.route(&link, &origin, event.payload.clone());
        }),
    );
    Ok(Registration::Push(subscription))
}

/// Join the subject's chat channel if needed, then forward every chat message.
pub(super) fn chat_messages(ctx: &LinkContext<'_>) -> Result<Registration, AdapterError> {
    let channel = ctx.identity()?;
    let kind = ctx.event_kind()?;
    let chat = ctx.connection.chat();

    if !chat.is_channel_joined(&channel) {
        info!(channel = %channel, "Joining chat channel");
        chat.join_channel(&channel).map_err(|e| {
            AdapterError::Subscription(format!("Failed to join chat channel {}: {}", channel, e))
        })?;
    }

    let router = ctx.router.clone();
    let link = ctx.link.clone();
    let origin = ctx.origin.clone();

    info!(attribute = %origin, channel = %channel, "Subscribing to chat messages");
    let subscription = ctx.connection.events().subscribe(
        kind,
        Arc::new(move |event: &PlatformEvent| {
            let raw: ChannelMessageEvent = match serde_json::from_value(event.payload.clone()) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(attribute = %origin, error = %e, "Dropping malformed chat message");
                    return;
                }
            };
            match serde_json::to_value(ChatMessage::from(raw)) {
                Ok(value) => {
                    router.route(&link, &origin, value);
                }
                Err(e) => warn!(attribute = %origin, error = %e, "Failed to encode chat message"),
            }
        }),
    );
    Ok(Registration::Push(subscription))
}

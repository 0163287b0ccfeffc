//! PULL registrations: remote calls deferred until the attribute is written.

use super::table::{LinkContext, PendingAction, Registration};
use crate::error::{AdapterError, RemoteError};
use std::sync::Arc;
use tracing::debug;

/// Look up the subject user and write the first match.
pub(super) fn get_user_info(ctx: &LinkContext<'_>) -> Result<Registration, AdapterError> {
    let user_id = ctx.identity()?;
    let connection = Arc::clone(ctx.connection);
    let router = ctx.router.clone();
    let link = ctx.link.clone();
    let origin = ctx.origin.clone();

    let action: PendingAction = Arc::new(move || {
        debug!(user_id = %user_id, "Fetching user info");
        let users = connection.helix().get_users(std::slice::from_ref(&user_id))?;
        let user = users
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::NotFound(format!("user {}", user_id)))?;
        router.route(&link, &origin, serde_json::to_value(user)?);
        Ok(())
    });
    Ok(Registration::Pull(action))
}

/// Create a clip of the subject's broadcast and write the created clip list.
pub(super) fn create_clip(ctx: &LinkContext<'_>) -> Result<Registration, AdapterError> {
    let broadcaster_id = ctx.identity()?;
    let connection = Arc::clone(ctx.connection);
    let router = ctx.router.clone();
    let link = ctx.link.clone();
    let origin = ctx.origin.clone();

    let action: PendingAction = Arc::new(move || {
        debug!(broadcaster_id = %broadcaster_id, "Creating clip");
        let clips = connection.helix().create_clip(&broadcaster_id, false)?;
        router.route(&link, &origin, serde_json::to_value(clips)?);
        Ok(())
    });
    Ok(Registration::Pull(action))
}

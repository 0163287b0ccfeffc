//! Dispatch table mapping each command to its mode and registration routine.

use super::{pull, push, Command, Mode};
use crate::connection::Connection;
use crate::credentials::AgentCredentials;
use crate::error::AdapterError;
use crate::link::AgentLink;
use crate::platform::{EventKind, Subscription};
use crate::router::ValueRouter;
use crate::types::AttributeRef;
use std::fmt;
use std::sync::Arc;

/// Deferred remote call bound to one attribute.
pub type PendingAction = Arc<dyn Fn() -> Result<(), AdapterError> + Send + Sync>;

/// Result of registering a link.
pub enum Registration {
    Pull(PendingAction),
    Push(Subscription),
}

impl Registration {
    pub fn mode(&self) -> Mode {
        match self {
            Registration::Pull(_) => Mode::Pull,
            Registration::Push(_) => Mode::Push,
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registration::Pull(_) => f.write_str("Registration::Pull"),
            Registration::Push(sub) => f.debug_tuple("Registration::Push").field(sub).finish(),
        }
    }
}

/// Agent identity field a command needs at link time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    UserId,
    Username,
}

impl Identity {
    pub fn field_name(&self) -> &'static str {
        match self {
            Identity::UserId => "user_id",
            Identity::Username => "username",
        }
    }

    /// Value of this identity field from the agent credentials.
    pub fn resolve<'a>(&self, credentials: &'a AgentCredentials) -> Option<&'a str> {
        match self {
            Identity::UserId => credentials.user_id(),
            Identity::Username => credentials.username(),
        }
    }
}

/// Everything a registration routine may capture.
pub struct LinkContext<'a> {
    pub spec: &'static CommandSpec,
    pub connection: &'a Arc<Connection>,
    pub credentials: &'a AgentCredentials,
    pub link: &'a AgentLink,
    pub origin: &'a AttributeRef,
    pub router: &'a ValueRouter,
}

impl LinkContext<'_> {
    /// The identity value the command requires. Checked before registration.
    pub(crate) fn identity(&self) -> Result<String, AdapterError> {
        let identity = self.spec.requires.ok_or_else(|| {
            AdapterError::Config(format!("{} declares no identity field", self.spec.name))
        })?;
        identity
            .resolve(self.credentials)
            .map(str::to_string)
            .ok_or_else(|| {
                AdapterError::Config(format!(
                    "{} requires {} but it is empty",
                    self.spec.name,
                    identity.field_name()
                ))
            })
    }

    pub(crate) fn event_kind(&self) -> Result<EventKind, AdapterError> {
        self.spec.event.ok_or_else(|| {
            AdapterError::Subscription(format!("{} has no event kind", self.spec.name))
        })
    }
}

/// Registration routine for one command.
pub type RegisterFn = fn(&LinkContext<'_>) -> Result<Registration, AdapterError>;

/// One row of the dispatch table.
pub struct CommandSpec {
    pub command: Command,
    pub name: &'static str,
    pub mode: Mode,
    /// Event kind a PUSH command subscribes to
    pub event: Option<EventKind>,
    /// Identity field that must be present at link time
    pub requires: Option<Identity>,
    pub register: RegisterFn,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("event", &self.event)
            .field("requires", &self.requires)
            .finish()
    }
}

const fn push_event(command: Command, name: &'static str, event: EventKind) -> CommandSpec {
    CommandSpec {
        command,
        name,
        mode: Mode::Push,
        event: Some(event),
        requires: None,
        register: push::forward_events,
    }
}

/// Ordered by `Command` discriminant.
pub static COMMAND_TABLE: [CommandSpec; 14] = [
    CommandSpec {
        command: Command::GetUserInfo,
        name: "GET_USER_INFO",
        mode: Mode::Pull,
        event: None,
        requires: Some(Identity::UserId),
        register: pull::get_user_info,
    },
    CommandSpec {
        command: Command::PostCreateClip,
        name: "POST_CREATE_CLIP",
        mode: Mode::Pull,
        event: None,
        requires: Some(Identity::UserId),
        register: pull::create_clip,
    },
    CommandSpec {
        command: Command::SubChatMessages,
        name: "SUB_CHAT_MESSAGES",
        mode: Mode::Push,
        event: Some(EventKind::ChannelMessage),
        requires: Some(Identity::Username),
        register: push::chat_messages,
    },
    push_event(Command::SubUserFollow, "SUB_USER_FOLLOW", EventKind::ChannelFollow),
    push_event(
        Command::SubUserSubscribe,
        "SUB_USER_SUBSCRIBE",
        EventKind::ChannelSubscribe,
    ),
    push_event(Command::SubUserCheer, "SUB_USER_CHEER", EventKind::ChannelCheer),
    push_event(Command::SubUserBan, "SUB_USER_BAN", EventKind::ChannelBan),
    push_event(Command::SubUserRaid, "SUB_USER_RAID", EventKind::ChannelRaid),
    push_event(
        Command::SubChannelPointsCreated,
        "SUB_CHANNELPOINTS_CREATED",
        EventKind::ChannelPointsRewardCreated,
    ),
    push_event(
        Command::SubChannelPointsRedeemed,
        "SUB_CHANNELPOINTS_REDEEMED",
        EventKind::ChannelPointsRedemption,
    ),
    push_event(
        Command::SubHypeTrainApproaching,
        "SUB_HYPETRAIN_APPROACHING",
        EventKind::HypeTrainApproaching,
    ),
    push_event(
        Command::SubHypeTrainStart,
        "SUB_HYPETRAIN_START",
        EventKind::HypeTrainStart,
    ),
    push_event(
        Command::SubHypeTrainLevelUp,
        "SUB_HYPETRAIN_LEVELUP",
        EventKind::HypeTrainLevelUp,
    ),
    push_event(
        Command::SubHypeTrainEnd,
        "SUB_HYPETRAIN_END",
        EventKind::HypeTrainEnd,
    ),
];

pub(super) fn lookup(command: Command) -> &'static CommandSpec {
    &COMMAND_TABLE[command as usize]
}

/// Check identity preconditions, then run the command's registration.
pub(crate) fn register(ctx: &LinkContext<'_>) -> Result<Registration, AdapterError> {
    if ctx.spec.requires.is_some() {
        ctx.identity()?;
    }
    (ctx.spec.register)(ctx)
}

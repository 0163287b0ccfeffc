//! Command Table
//!
//! Closed set of commands an attribute can be linked to. Each command is
//! statically either PULL (run on attribute write) or PUSH (standing
//! subscription opened at link time), and carries its registration routine
//! in the dispatch table.

mod pull;
mod push;
mod table;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub(crate) use table::register;
pub use table::{
    CommandSpec, Identity, LinkContext, PendingAction, RegisterFn, Registration, COMMAND_TABLE,
};

/// Invocation mode of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Executed synchronously when the linked attribute is written
    Pull,
    /// Standing subscription delivering events asynchronously
    Push,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Pull => f.write_str("PULL"),
            Mode::Push => f.write_str("PUSH"),
        }
    }
}

/// Command an attribute can be linked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    #[serde(rename = "GET_USER_INFO")]
    GetUserInfo,
    #[serde(rename = "POST_CREATE_CLIP")]
    PostCreateClip,
    #[serde(rename = "SUB_CHAT_MESSAGES")]
    SubChatMessages,
    #[serde(rename = "SUB_USER_FOLLOW")]
    SubUserFollow,
    #[serde(rename = "SUB_USER_SUBSCRIBE")]
    SubUserSubscribe,
    #[serde(rename = "SUB_USER_CHEER")]
    SubUserCheer,
    #[serde(rename = "SUB_USER_BAN")]
    SubUserBan,
    #[serde(rename = "SUB_USER_RAID")]
    SubUserRaid,
    #[serde(rename = "SUB_CHANNELPOINTS_CREATED")]
    SubChannelPointsCreated,
    #[serde(rename = "SUB_CHANNELPOINTS_REDEEMED")]
    SubChannelPointsRedeemed,
    #[serde(rename = "SUB_HYPETRAIN_APPROACHING")]
    SubHypeTrainApproaching,
    #[serde(rename = "SUB_HYPETRAIN_START")]
    SubHypeTrainStart,
    #[serde(rename = "SUB_HYPETRAIN_LEVELUP")]
    SubHypeTrainLevelUp,
    #[serde(rename = "SUB_HYPETRAIN_END")]
    SubHypeTrainEnd,
}

impl Command {
    /// Table entry for this command.
    pub fn spec(&self) -> &'static CommandSpec {
        table::lookup(*self)
    }

    pub fn mode(&self) -> Mode {
        self.spec().mode
    }

    /// Wire name, e.g. `SUB_HYPETRAIN_LEVELUP`.
    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    pub fn all() -> impl Iterator<Item = Command> {
        COMMAND_TABLE.iter().map(|spec| spec.command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        COMMAND_TABLE
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(wanted))
            .map(|spec| spec.command)
            .ok_or_else(|| format!("Unknown command: {}", s))
    }
}

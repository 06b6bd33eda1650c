//! Commands as delivered by the host framework
//!
//! The host parses the command text and checks the invoker's permissions;
//! `authorized` carries the result of that check.

use rolebot_core::Snowflake;
use serde::{Deserialize, Serialize};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Command {
    /// `reactrole <emoji> <role> <message>`
    #[serde(alias = "crr")]
    ReactRole {
        #[serde(default)]
        emoji: String,
        #[serde(default)]
        role: String,
        #[serde(default)]
        message: String,
    },

    /// `removereactrole <role>`
    #[serde(alias = "rrr")]
    RemoveReactRole {
        #[serde(default)]
        role: String,
    },

    #[serde(alias = "setcount")]
    SetMemberCount,

    #[serde(alias = "removecount")]
    RemoveMemberCount,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReactRole { .. } => "reactrole",
            Self::RemoveReactRole { .. } => "removereactrole",
            Self::SetMemberCount => "setmembercount",
            Self::RemoveMemberCount => "removemembercount",
        }
    }

    /// Permission the invoker needs
    pub fn required_permission(&self) -> &'static str {
        match self {
            Self::ReactRole { .. } | Self::RemoveReactRole { .. } => "Manage Roles",
            Self::SetMemberCount | Self::RemoveMemberCount => "Manage Channels",
        }
    }
}

/// A command invoked by a user in a guild channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInvocation {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    /// Whether the invoker holds the command's required permission
    #[serde(default)]
    pub authorized: bool,
    #[serde(flatten)]
    pub command: Command,
}

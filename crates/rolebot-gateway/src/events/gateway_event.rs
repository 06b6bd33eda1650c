//! Gateway event types
//!
//! Events arrive as `{"t": "<EVENT_NAME>", "d": {...}}`.

use rolebot_commands::CommandInvocation;
use rolebot_core::{MemberEvent, MemberEventKind, ReactionDirection, ReactionEvent, Snowflake};
use serde::{Deserialize, Serialize};

/// Payload of `MESSAGE_REACTION_ADD` / `MESSAGE_REACTION_REMOVE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionPayload {
    pub guild_id: Snowflake,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: String,
}

impl ReactionPayload {
    pub fn into_event(self, direction: ReactionDirection) -> ReactionEvent {
        ReactionEvent::new(
            self.guild_id,
            self.message_id,
            self.user_id,
            self.emoji,
            direction,
        )
    }
}

/// Payload of `GUILD_MEMBER_ADD` / `GUILD_MEMBER_REMOVE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPayload {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
}

impl MemberPayload {
    pub fn into_event(self, kind: MemberEventKind) -> MemberEvent {
        MemberEvent {
            guild_id: self.guild_id,
            user_id: self.user_id,
            kind,
        }
    }
}

/// An event delivered to the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEvent {
    MessageReactionAdd(ReactionPayload),
    MessageReactionRemove(ReactionPayload),
    GuildMemberAdd(MemberPayload),
    GuildMemberRemove(MemberPayload),
    Command(CommandInvocation),
}

impl GatewayEvent {
    /// Get the event name
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::MessageReactionAdd(_) => "MESSAGE_REACTION_ADD",
            Self::MessageReactionRemove(_) => "MESSAGE_REACTION_REMOVE",
            Self::GuildMemberAdd(_) => "GUILD_MEMBER_ADD",
            Self::GuildMemberRemove(_) => "GUILD_MEMBER_REMOVE",
            Self::Command(_) => "COMMAND",
        }
    }

    /// Guild the event belongs to
    pub fn guild_id(&self) -> Snowflake {
        match self {
            Self::MessageReactionAdd(p) | Self::MessageReactionRemove(p) => p.guild_id,
            Self::GuildMemberAdd(p) | Self::GuildMemberRemove(p) => p.guild_id,
            Self::Command(invocation) => invocation.guild_id,
        }
    }
}

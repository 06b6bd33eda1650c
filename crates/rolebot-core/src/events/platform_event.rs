//! Reaction and membership events as delivered by the platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Whether a reaction was added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionDirection {
    Add,
    Remove,
}

impl ReactionDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

/// A reaction added to or removed from a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub guild_id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: String,
    pub direction: ReactionDirection,
    #[serde(default = "Utc::now")]
    pub occurred_at: DateTime<Utc>,
}

impl ReactionEvent {
    /// Create a reaction event stamped with the current time
    pub fn new(
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: impl Into<String>,
        direction: ReactionDirection,
    ) -> Self {
        Self {
            guild_id,
            message_id,
            user_id,
            emoji: emoji.into(),
            direction,
            occurred_at: Utc::now(),
        }
    }

    pub fn add(
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: impl Into<String>,
    ) -> Self {
        Self::new(guild_id, message_id, user_id, emoji, ReactionDirection::Add)
    }

    pub fn remove(
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: impl Into<String>,
    ) -> Self {
        Self::new(guild_id, message_id, user_id, emoji, ReactionDirection::Remove)
    }

    /// Milliseconds since the event was received, never negative
    pub fn lag_ms(&self) -> i64 {
        (Utc::now() - self.occurred_at).num_milliseconds().max(0)
    }
}

/// Member joined or left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberEventKind {
    Joined,
    Left,
}

/// Guild membership change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEvent {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub kind: MemberEventKind,
}

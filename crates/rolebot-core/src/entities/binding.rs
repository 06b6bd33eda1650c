//! Binding entity - ties an emoji reaction on a message to a role

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Reaction-role binding
///
/// Reacting to `message_id` with `emoji` grants `role_id`; removing the
/// reaction revokes it. `role_name` is kept for human-readable reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub guild_id: Snowflake,
    pub message_id: Snowflake,
    pub emoji: String,
    pub role_id: Snowflake,
    pub role_name: String,
}

impl Binding {
    /// Create a new Binding
    pub fn new(
        guild_id: Snowflake,
        message_id: Snowflake,
        emoji: impl Into<String>,
        role_id: Snowflake,
        role_name: impl Into<String>,
    ) -> Self {
        Self {
            guild_id,
            message_id,
            emoji: emoji.into(),
            role_id,
            role_name: role_name.into(),
        }
    }

    /// Check if this binding is triggered by `emoji` on `message_id`.
    /// Emoji tokens are compared by exact value.
    #[inline]
    pub fn matches(&self, message_id: Snowflake, emoji: &str) -> bool {
        self.message_id == message_id && self.emoji == emoji
    }

    /// Check if this binding grants `role_id` within `guild_id`
    #[inline]
    pub fn grants(&self, guild_id: Snowflake, role_id: Snowflake) -> bool {
        self.guild_id == guild_id && self.role_id == role_id
    }
}

//! Chat platform port
//!
//! Every call is an opaque external request that may fail or time out.

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::Role;
use crate::value_objects::Snowflake;

/// Result type for platform calls
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Platform call failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Missing permission or role hierarchy prevents the action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unknown {resource}: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Unknown Emoji: {0}")]
    UnknownEmoji(String),

    #[error("Platform request timed out")]
    Timeout,

    #[error("Platform request failed: {0}")]
    Request(String),
}

impl PlatformError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Current roles of a guild
    async fn guild_roles(&self, guild_id: Snowflake) -> PlatformResult<Vec<Role>>;

    /// Current member count of a guild
    async fn member_count(&self, guild_id: Snowflake) -> PlatformResult<u64>;

    /// Send a message, returning its ID
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<Snowflake>;

    /// Add a reaction as the bot user
    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> PlatformResult<()>;

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<()>;

    /// Grant a role to a member
    async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()>;

    /// Revoke a role from a member
    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()>;

    async fn rename_channel(&self, channel_id: Snowflake, name: &str) -> PlatformResult<()>;
}

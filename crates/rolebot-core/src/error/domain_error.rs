//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("No reaction role bindings for role {0}")]
    NoBindingsForRole(Snowflake),

    #[error("Channel {0} is not the member count channel")]
    NotCountingMembers(Snowflake),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Message {message_id} already binds {emoji} to a role")]
    DuplicateBinding { message_id: Snowflake, emoji: String },

    #[error("Channel {0} is already counting members")]
    AlreadyCountingMembers(Snowflake),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and replies
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoBindingsForRole(_) => "UNKNOWN_REACTION_ROLE",
            Self::NotCountingMembers(_) => "NOT_COUNTING_MEMBERS",
            Self::DuplicateBinding { .. } => "DUPLICATE_BINDING",
            Self::AlreadyCountingMembers(_) => "ALREADY_COUNTING_MEMBERS",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoBindingsForRole(_) | Self::NotCountingMembers(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateBinding { .. } | Self::AlreadyCountingMembers(_)
        )
    }
}

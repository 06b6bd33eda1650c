//! Command errors and their user-facing replies
//!
//! Every failure a command can hit maps to one variant, and every variant
//! maps to the reply the invoking user sees.

use rolebot_core::Snowflake;
use rolebot_service::ServiceError;
use thiserror::Error;

/// Command error type
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing permission: {0}")]
    MissingPermission(&'static str),

    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// Role argument of `reactrole` did not match a guild role
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Role argument of `removereactrole` has no bindings in this guild
    #[error("not a reaction role: {0}")]
    NotAReactionRole(String),

    #[error("invalid emoji: {0}")]
    InvalidEmoji(String),

    /// The platform refused an action the bot needs
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("channel {0} is already counting members")]
    AlreadyCounting(Snowflake),

    #[error("channel {0} is not counting members")]
    NotCounting(Snowflake),

    #[error("unexpected error while {action}: {source}")]
    Unexpected {
        action: &'static str,
        #[source]
        source: ServiceError,
    },
}

/// Result type for command handlers
pub type CommandResult<T> = Result<T, CommandError>;

impl CommandError {
    pub fn unexpected(action: &'static str, source: impl Into<ServiceError>) -> Self {
        Self::Unexpected {
            action,
            source: source.into(),
        }
    }

    /// Whether this is a fault worth logging rather than a user mistake
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Unexpected { .. })
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingPermission(_) => "MISSING_PERMISSION",
            Self::MissingArgument(_) => "MISSING_ARGUMENT",
            Self::UnknownRole(_) => "UNKNOWN_ROLE",
            Self::NotAReactionRole(_) => "UNKNOWN_REACTION_ROLE",
            Self::InvalidEmoji(_) => "INVALID_EMOJI",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::AlreadyCounting(_) => "ALREADY_COUNTING_MEMBERS",
            Self::NotCounting(_) => "NOT_COUNTING_MEMBERS",
            Self::Unexpected { source, .. } => source.error_code(),
        }
    }

    /// Reply text for the invoking user
    pub fn reply(&self, author_id: Snowflake, prefix: &str) -> String {
        let body = match self {
            Self::MissingPermission(permission) => {
                format!("You need the **{permission}** permission to use this command.")
            }
            Self::MissingArgument(_) => format!(
                "Please enter all the required arguments. Use `{prefix}help crr` for more information."
            ),
            Self::UnknownRole(_) => {
                "That role does not exist. Please create the role first.".to_string()
            }
            Self::NotAReactionRole(role) => {
                format!("**{role}** either doesn't exist, or isn't a reaction role on this server.")
            }
            Self::InvalidEmoji(_) => "Sorry, that emoji is invalid.".to_string(),
            Self::Forbidden(hint) => hint.clone(),
            Self::AlreadyCounting(_) => "This channel is already counting members.".to_string(),
            Self::NotCounting(_) => "This channel is not the member count channel.".to_string(),
            Self::Unexpected { action, .. } => {
                format!("An unknown error occurred while {action}. Please try again later.")
            }
        };
        format!(":x: <@{author_id}>: {body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolebot_core::{DomainError, StoreError};

    #[test]
    fn test_replies() {
        let author = Snowflake::new(3);

        assert_eq!(
            CommandError::NotAReactionRole("Verified".to_string()).reply(author, "~"),
            ":x: <@3>: **Verified** either doesn't exist, or isn't a reaction role on this server."
        );
        assert_eq!(
            CommandError::MissingArgument("role").reply(author, "?"),
            ":x: <@3>: Please enter all the required arguments. Use `?help crr` for more information."
        );
        assert_eq!(
            CommandError::InvalidEmoji("nope".to_string()).reply(author, "~"),
            ":x: <@3>: Sorry, that emoji is invalid."
        );
    }

    #[test]
    fn test_unexpected() {
        let err = CommandError::unexpected(
            "creating your reaction role",
            ServiceError::StoreWrite(StoreError::Encode("boom".to_string())),
        );
        assert!(err.is_unexpected());
        assert_eq!(err.error_code(), "STORE_WRITE_ERROR");
        assert!(err
            .reply(Snowflake::new(3), "~")
            .ends_with("An unknown error occurred while creating your reaction role. Please try again later."));

        let err = CommandError::unexpected("x", DomainError::InternalError("y".to_string()));
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}

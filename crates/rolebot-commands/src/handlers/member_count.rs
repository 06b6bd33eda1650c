//! Member count channel commands

use rolebot_core::{DomainError, PlatformError};
use rolebot_service::{MemberCountService, ServiceContext, ServiceError};

use crate::invocation::CommandInvocation;
use crate::response::{CommandError, CommandResult};

const ACTION: &str = "updating the member count channel";

const RENAME_FORBIDDEN: &str =
    "I am forbidden from renaming this channel. Check my Manage Channels permission.";

pub(super) async fn set_member_count(
    ctx: &ServiceContext,
    invocation: &CommandInvocation,
) -> CommandResult<Option<String>> {
    MemberCountService::new(ctx)
        .set_member_count(invocation.guild_id, invocation.channel_id)
        .await
        .map_err(command_error)?;

    Ok(Some(
        "✅ This channel has been set as the member count channel.".to_string(),
    ))
}

pub(super) async fn remove_member_count(
    ctx: &ServiceContext,
    invocation: &CommandInvocation,
) -> CommandResult<Option<String>> {
    MemberCountService::new(ctx)
        .remove_member_count(invocation.guild_id, invocation.channel_id)
        .await
        .map_err(command_error)?;

    Ok(Some(
        "✅ This channel has been removed as the member count channel.".to_string(),
    ))
}

fn command_error(err: ServiceError) -> CommandError {
    match err {
        ServiceError::Domain(DomainError::AlreadyCountingMembers(channel_id)) => {
            CommandError::AlreadyCounting(channel_id)
        }
        ServiceError::Domain(DomainError::NotCountingMembers(channel_id)) => {
            CommandError::NotCounting(channel_id)
        }
        ServiceError::Platform(PlatformError::Forbidden(_)) => {
            CommandError::Forbidden(RENAME_FORBIDDEN.to_string())
        }
        err => CommandError::unexpected(ACTION, err),
    }
}

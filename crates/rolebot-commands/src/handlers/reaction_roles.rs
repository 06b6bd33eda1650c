//! Reaction role commands
//!
//! `reactrole` posts the message, adds the emoji, then records the binding.
//! `removereactrole` deletes the bound messages, then drops the bindings.

use rolebot_core::{PlatformError, Snowflake};
use rolebot_service::{ServiceContext, ServiceError};
use tracing::{debug, warn};

use super::roles::find_role;
use crate::invocation::CommandInvocation;
use crate::response::{CommandError, CommandResult};

const CREATE_ACTION: &str = "creating your reaction role";
const REMOVE_ACTION: &str = "removing your reaction role";

const ROLE_FORBIDDEN: &str =
    "I am forbidden from assigning/removing this role. Try moving this role above the reaction role.";
const DELETE_FORBIDDEN: &str =
    "I am forbidden from deleting the reaction role message. Check my Manage Messages permission in this channel.";

pub(super) async fn create_reaction_role(
    ctx: &ServiceContext,
    invocation: &CommandInvocation,
    emoji: &str,
    role_arg: &str,
    message: &str,
) -> CommandResult<Option<String>> {
    let emoji = emoji.trim();
    if emoji.is_empty() {
        return Err(CommandError::MissingArgument("emoji"));
    }
    if role_arg.trim().is_empty() {
        return Err(CommandError::MissingArgument("role"));
    }
    if message.trim().is_empty() {
        return Err(CommandError::MissingArgument("message"));
    }

    let platform = ctx.platform();
    let roles = platform
        .guild_roles(invocation.guild_id)
        .await
        .map_err(|e| CommandError::unexpected(CREATE_ACTION, e))?;
    let role = find_role(&roles, role_arg)
        .ok_or_else(|| CommandError::UnknownRole(role_arg.trim().to_string()))?;

    let message_id = platform
        .send_message(invocation.channel_id, message)
        .await
        .map_err(|e| create_error(e.into()))?;

    if let Err(e) = platform
        .add_reaction(invocation.channel_id, message_id, emoji)
        .await
    {
        discard_message(ctx, invocation.channel_id, message_id).await;
        return Err(match e {
            PlatformError::UnknownEmoji(_) => CommandError::InvalidEmoji(emoji.to_string()),
            e => create_error(e.into()),
        });
    }

    if let Err(e) = ctx
        .bindings()
        .create_binding(invocation.guild_id, message_id, emoji, role.id, &role.name)
        .await
    {
        discard_message(ctx, invocation.channel_id, message_id).await;
        return Err(create_error(e));
    }

    Ok(None)
}

pub(super) async fn remove_reaction_role(
    ctx: &ServiceContext,
    invocation: &CommandInvocation,
    role_arg: &str,
) -> CommandResult<Option<String>> {
    let role_arg = role_arg.trim();
    if role_arg.is_empty() {
        return Err(CommandError::MissingArgument("role"));
    }

    let platform = ctx.platform();
    let roles = platform
        .guild_roles(invocation.guild_id)
        .await
        .map_err(|e| CommandError::unexpected(REMOVE_ACTION, e))?;

    // A deleted role can still be removed by ID
    let role = find_role(&roles, role_arg);
    let role_id = match role {
        Some(role) => role.id,
        None => Snowflake::parse_role_mention(role_arg)
            .map_err(|_| CommandError::NotAReactionRole(role_arg.to_string()))?,
    };

    let bindings = ctx.bindings().bindings_for_role(invocation.guild_id, role_id);
    let role_name = match (role, bindings.first()) {
        (Some(role), _) => role.name.clone(),
        (None, Some(binding)) => binding.role_name.clone(),
        (None, None) => role_arg.to_string(),
    };
    if bindings.is_empty() {
        return Err(CommandError::NotAReactionRole(role_name));
    }

    for binding in &bindings {
        match platform
            .delete_message(invocation.channel_id, binding.message_id)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(message_id = %binding.message_id, "Reaction role message already gone");
            }
            Err(PlatformError::Forbidden(_)) => {
                return Err(CommandError::Forbidden(DELETE_FORBIDDEN.to_string()));
            }
            Err(e) => return Err(CommandError::unexpected(REMOVE_ACTION, e)),
        }
    }

    ctx.bindings()
        .remove_bindings_for_role(invocation.guild_id, role_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                CommandError::NotAReactionRole(role_name.clone())
            } else {
                CommandError::unexpected(REMOVE_ACTION, e)
            }
        })?;

    Ok(Some(format!("👍🏻 Done. 🔧 Removed '{role_name}'.")))
}

fn create_error(err: ServiceError) -> CommandError {
    match err {
        ServiceError::Platform(PlatformError::Forbidden(_)) => {
            CommandError::Forbidden(ROLE_FORBIDDEN.to_string())
        }
        err => CommandError::unexpected(CREATE_ACTION, err),
    }
}

/// Best-effort removal of a reaction role message that never got a binding
async fn discard_message(ctx: &ServiceContext, channel_id: Snowflake, message_id: Snowflake) {
    if let Err(e) = ctx.platform().delete_message(channel_id, message_id).await {
        warn!(message_id = %message_id, error = %e, "Failed to delete unbound reaction role message");
    }
}

//! Command handlers
//!
//! `CommandHandler::execute` runs a command and returns its reply or error;
//! `CommandHandler::handle` additionally sends the reply to the invoking
//! channel and logs unexpected failures.

mod member_count;
mod reaction_roles;
mod roles;

pub use roles::find_role;

use rolebot_service::ServiceContext;
use tracing::{debug, error, instrument, warn};

use crate::invocation::{Command, CommandInvocation};
use crate::response::{CommandError, CommandResult};

/// Command handler
pub struct CommandHandler<'a> {
    ctx: &'a ServiceContext,
    prefix: &'a str,
}

impl<'a> CommandHandler<'a> {
    pub fn new(ctx: &'a ServiceContext, prefix: &'a str) -> Self {
        Self { ctx, prefix }
    }

    /// Run a command. `Ok(None)` means the command succeeded silently.
    pub async fn execute(&self, invocation: &CommandInvocation) -> CommandResult<Option<String>> {
        if !invocation.authorized {
            return Err(CommandError::MissingPermission(
                invocation.command.required_permission(),
            ));
        }

        match &invocation.command {
            Command::ReactRole {
                emoji,
                role,
                message,
            } => reaction_roles::create_reaction_role(self.ctx, invocation, emoji, role, message)
                .await,
            Command::RemoveReactRole { role } => {
                reaction_roles::remove_reaction_role(self.ctx, invocation, role).await
            }
            Command::SetMemberCount => member_count::set_member_count(self.ctx, invocation).await,
            Command::RemoveMemberCount => {
                member_count::remove_member_count(self.ctx, invocation).await
            }
        }
    }

    /// Run a command and reply in the invoking channel.
    ///
    /// Returns the reply sent, if any.
    #[instrument(
        skip(self, invocation),
        fields(
            command = invocation.command.name(),
            guild_id = %invocation.guild_id,
            channel_id = %invocation.channel_id,
            author_id = %invocation.author_id,
        )
    )]
    pub async fn handle(&self, invocation: &CommandInvocation) -> Option<String> {
        let reply = match self.execute(invocation).await {
            Ok(None) => return None,
            Ok(Some(reply)) => reply,
            Err(e) => {
                if e.is_unexpected() {
                    error!(error = %e, code = e.error_code(), "Command failed");
                } else {
                    debug!(code = e.error_code(), "Command rejected");
                }
                e.reply(invocation.author_id, self.prefix)
            }
        };

        if let Err(e) = self
            .ctx
            .platform()
            .send_message(invocation.channel_id, &reply)
            .await
        {
            warn!(error = %e, "Failed to send command reply");
        }
        Some(reply)
    }
}

//! Reaction event reconciler
//!
//! Turns reaction add/remove events into role grants and revokes. Only
//! reads the binding index. Every event is handled on its own: failures are
//! reported as an outcome and never stop later events.

use rolebot_core::{PlatformError, ReactionDirection, ReactionEvent, Snowflake};
use tracing::{info, instrument, trace, warn};

use super::context::ServiceContext;

/// What happened to a reaction event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No binding for the message and emoji, or the bot's own reaction
    Ignored,
    Granted { role_id: Snowflake },
    Revoked { role_id: Snowflake },
    /// The bound role no longer exists in the guild
    RoleMissing { role_id: Snowflake },
    /// The platform refused the change (permissions or role hierarchy)
    Forbidden { role_id: Snowflake, reason: String },
    Failed { role_id: Snowflake, error: PlatformError },
}

impl ReconcileOutcome {
    /// Whether the member's roles were changed (or already matched)
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Granted { .. } | Self::Revoked { .. })
    }
}

/// Reaction event reconciler
pub struct ReactionReconciler<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionReconciler<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply the binding matched by `event`, if any
    #[instrument(
        skip(self, event),
        fields(
            guild_id = %event.guild_id,
            message_id = %event.message_id,
            user_id = %event.user_id,
            direction = event.direction.as_str(),
            lag_ms = event.lag_ms(),
        )
    )]
    pub async fn reconcile(&self, event: &ReactionEvent) -> ReconcileOutcome {
        if event.user_id == self.ctx.bot_user_id() {
            trace!("Ignoring own reaction");
            return ReconcileOutcome::Ignored;
        }

        let Some(binding) = self
            .ctx
            .bindings()
            .find_binding(event.message_id, &event.emoji)
        else {
            trace!(emoji = %event.emoji, "No binding for reaction");
            return ReconcileOutcome::Ignored;
        };
        let role_id = binding.role_id;

        match self.ctx.platform().guild_roles(event.guild_id).await {
            Ok(roles) if roles.iter().any(|r| r.id == role_id) => {}
            Ok(_) => {
                warn!(
                    role_id = %role_id,
                    role_name = %binding.role_name,
                    "Bound role no longer exists"
                );
                return ReconcileOutcome::RoleMissing { role_id };
            }
            Err(error) => return Self::rejected(role_id, error),
        }

        let platform = self.ctx.platform();
        let result = match event.direction {
            ReactionDirection::Add => platform.add_role(event.guild_id, event.user_id, role_id).await,
            ReactionDirection::Remove => {
                platform
                    .remove_role(event.guild_id, event.user_id, role_id)
                    .await
            }
        };

        match result {
            Ok(()) => {
                info!(role_id = %role_id, role_name = %binding.role_name, "Reaction role applied");
                match event.direction {
                    ReactionDirection::Add => ReconcileOutcome::Granted { role_id },
                    ReactionDirection::Remove => ReconcileOutcome::Revoked { role_id },
                }
            }
            Err(error) => Self::rejected(role_id, error),
        }
    }

    fn rejected(role_id: Snowflake, error: PlatformError) -> ReconcileOutcome {
        match error {
            PlatformError::Forbidden(reason) => {
                warn!(role_id = %role_id, %reason, "Missing permissions to manage role");
                ReconcileOutcome::Forbidden { role_id, reason }
            }
            error => {
                warn!(role_id = %role_id, error = %error, "Reaction role update failed");
                ReconcileOutcome::Failed { role_id, error }
            }
        }
    }
}

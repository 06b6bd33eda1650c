//! Test helpers
//!
//! `TestBot` owns a temporary binding table and drives the dispatcher the
//! same way the harness binary does.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use rolebot_commands::{Command, CommandInvocation};
use rolebot_common::AppConfig;
use rolebot_gateway::{
    build_context, DispatchOutcome, EventDispatcher, GatewayEvent, MemberPayload, ReactionPayload,
};
use rolebot_service::MemoryPlatform;
use serde_json::Value;
use tempfile::TempDir;

use crate::fixtures::{platform_fixture, sf, ADMIN_USER_ID, BOT_USER_ID, CHANNEL_ID, GUILD_ID};

/// A bot wired to a temporary store and an in-memory platform
pub struct TestBot {
    pub dispatcher: Arc<EventDispatcher>,
    pub platform: Arc<MemoryPlatform>,
    dir: TempDir,
    strict: bool,
}

impl TestBot {
    /// Start with an empty binding table
    pub fn start() -> Result<Self> {
        Self::start_with(false)
    }

    pub fn start_with(strict: bool) -> Result<Self> {
        let dir = TempDir::new()?;
        let platform = Arc::new(MemoryPlatform::from_fixture(platform_fixture()));
        let dispatcher = Self::build_dispatcher(&dir, platform.clone(), strict, true)?;
        Ok(Self {
            dispatcher,
            platform,
            dir,
            strict,
        })
    }

    /// Simulate a process restart: reload the table from disk
    pub fn restart(&mut self) -> Result<()> {
        self.dispatcher = Self::build_dispatcher(&self.dir, self.platform.clone(), self.strict, false)?;
        Ok(())
    }

    fn build_dispatcher(
        dir: &TempDir,
        platform: Arc<MemoryPlatform>,
        strict: bool,
        init: bool,
    ) -> Result<Arc<EventDispatcher>> {
        let vars: HashMap<&str, String> = HashMap::from([
            ("BOT_USER_ID", BOT_USER_ID.to_string()),
            ("STORE_PATH", store_path(dir).display().to_string()),
            ("STORE_INIT", init.to_string()),
            ("STRICT_BINDINGS", strict.to_string()),
            ("COMMAND_PREFIX", "~".to_string()),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned())?;
        let ctx = build_context(&config, platform)?;
        Ok(Arc::new(EventDispatcher::new(ctx, config.bot.command_prefix)))
    }

    pub fn store_path(&self) -> PathBuf {
        store_path(&self.dir)
    }

    /// Raw binding table as persisted
    pub fn stored_table(&self) -> Result<Vec<Value>> {
        let bytes = std::fs::read(self.store_path())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn react(&self, message_id: i64, user_id: i64, emoji: &str) -> DispatchOutcome {
        self.dispatcher
            .dispatch(GatewayEvent::MessageReactionAdd(reaction(message_id, user_id, emoji)))
            .await
    }

    pub async fn unreact(&self, message_id: i64, user_id: i64, emoji: &str) -> DispatchOutcome {
        self.dispatcher
            .dispatch(GatewayEvent::MessageReactionRemove(reaction(message_id, user_id, emoji)))
            .await
    }

    pub async fn member_joined(&self, user_id: i64) -> DispatchOutcome {
        self.platform.insert_member(sf(GUILD_ID), sf(user_id));
        self.dispatcher
            .dispatch(GatewayEvent::GuildMemberAdd(MemberPayload {
                guild_id: sf(GUILD_ID),
                user_id: sf(user_id),
            }))
            .await
    }

    /// Run a command as the guild admin; returns the reply
    pub async fn command(&self, command: Command) -> Option<String> {
        match self
            .dispatcher
            .dispatch(GatewayEvent::Command(admin_invocation(command)))
            .await
        {
            DispatchOutcome::Command { reply } => reply,
            _ => None,
        }
    }

    pub async fn react_role(&self, emoji: &str, role: &str, message: &str) -> Option<String> {
        self.command(Command::ReactRole {
            emoji: emoji.to_string(),
            role: role.to_string(),
            message: message.to_string(),
        })
        .await
    }

    pub async fn remove_react_role(&self, role: &str) -> Option<String> {
        self.command(Command::RemoveReactRole {
            role: role.to_string(),
        })
        .await
    }

    /// Record a binding directly, as if its message had been posted earlier
    pub async fn bind(&self, message_id: i64, emoji: &str, role_id: i64, role_name: &str) -> Result<()> {
        self.dispatcher
            .context()
            .bindings()
            .create_binding(sf(GUILD_ID), sf(message_id), emoji, sf(role_id), role_name)
            .await?;
        Ok(())
    }

    /// Message ID of the most recently created binding
    pub fn last_bound_message(&self) -> Option<i64> {
        self.dispatcher
            .context()
            .bindings()
            .snapshot()
            .all()
            .last()
            .map(|b| b.message_id.into_inner())
    }
}

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("files").join("reactionroles.json")
}

pub fn reaction(message_id: i64, user_id: i64, emoji: &str) -> ReactionPayload {
    ReactionPayload {
        guild_id: sf(GUILD_ID),
        channel_id: Some(sf(CHANNEL_ID)),
        message_id: sf(message_id),
        user_id: sf(user_id),
        emoji: emoji.to_string(),
    }
}

pub fn admin_invocation(command: Command) -> CommandInvocation {
    CommandInvocation {
        guild_id: sf(GUILD_ID),
        channel_id: sf(CHANNEL_ID),
        author_id: sf(ADMIN_USER_ID),
        authorized: true,
        command,
    }
}

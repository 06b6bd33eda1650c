//! In-memory platform
//!
//! Keeps guilds, roles, members, messages and channel names in process and
//! records every mutating call, so tests can assert on exactly what the bot
//! asked the platform to do. Role grants follow the platform's hierarchy
//! rule: the bot can only manage roles below its own highest role.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rolebot_core::{Platform, PlatformError, PlatformResult, Role, Snowflake};
use serde::{Deserialize, Serialize};

/// Seed data for a `MemoryPlatform`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformFixture {
    #[serde(default)]
    pub guilds: Vec<GuildFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildFixture {
    pub id: Snowflake,
    #[serde(default)]
    pub roles: Vec<RoleFixture>,
    #[serde(default)]
    pub members: Vec<Snowflake>,
    /// Position of the bot's highest role
    #[serde(default = "default_bot_position")]
    pub bot_position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleFixture {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub position: i32,
}

fn default_bot_position() -> i32 {
    100
}

/// A mutating call the bot made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    SendMessage { channel_id: Snowflake, content: String },
    AddReaction { message_id: Snowflake, emoji: String },
    DeleteMessage { channel_id: Snowflake, message_id: Snowflake },
    AddRole { guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake },
    RemoveRole { guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake },
    RenameChannel { channel_id: Snowflake, name: String },
}

#[derive(Debug, Default)]
struct GuildState {
    roles: Vec<Role>,
    members: HashMap<Snowflake, BTreeSet<Snowflake>>,
    bot_position: i32,
}

#[derive(Debug)]
struct MessageState {
    channel_id: Snowflake,
    content: String,
    reactions: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    guilds: HashMap<Snowflake, GuildState>,
    messages: HashMap<Snowflake, MessageState>,
    channel_names: HashMap<Snowflake, String>,
    forbidden_channels: HashSet<Snowflake>,
    calls: Vec<PlatformCall>,
}

impl State {
    fn guild(&self, guild_id: Snowflake) -> PlatformResult<&GuildState> {
        self.guilds
            .get(&guild_id)
            .ok_or_else(|| PlatformError::not_found("Guild", guild_id))
    }

    fn guild_mut(&mut self, guild_id: Snowflake) -> PlatformResult<&mut GuildState> {
        self.guilds
            .get_mut(&guild_id)
            .ok_or_else(|| PlatformError::not_found("Guild", guild_id))
    }

    fn check_channel(&self, channel_id: Snowflake) -> PlatformResult<()> {
        if self.forbidden_channels.contains(&channel_id) {
            return Err(PlatformError::Forbidden(format!(
                "Missing Permissions in channel {channel_id}"
            )));
        }
        Ok(())
    }
}

impl GuildState {
    /// Resolve a role the bot is allowed to hand out
    fn manageable_role(&self, role_id: Snowflake) -> PlatformResult<&Role> {
        let role = self
            .roles
            .iter()
            .find(|r| r.id == role_id)
            .ok_or_else(|| PlatformError::not_found("Role", role_id))?;

        if !role.is_manageable_from(self.bot_position) {
            return Err(PlatformError::Forbidden(format!(
                "Missing Permissions: role {} is not below the bot's highest role",
                role.name
            )));
        }
        Ok(role)
    }

    fn member_roles_mut(&mut self, user_id: Snowflake) -> PlatformResult<&mut BTreeSet<Snowflake>> {
        self.members
            .get_mut(&user_id)
            .ok_or_else(|| PlatformError::not_found("Member", user_id))
    }
}

/// Accepts `<:name:id>` / `<a:name:id>` custom emoji and unicode emoji
fn is_valid_emoji(emoji: &str) -> bool {
    let custom = emoji
        .strip_prefix("<a:")
        .or_else(|| emoji.strip_prefix("<:"))
        .and_then(|rest| rest.strip_suffix('>'))
        .and_then(|inner| inner.rsplit_once(':'))
        .is_some_and(|(name, id)| {
            !name.is_empty() && !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
        });

    custom || (!emoji.is_empty() && !emoji.is_ascii())
}

/// In-memory `Platform` implementation
#[derive(Debug)]
pub struct MemoryPlatform {
    state: Mutex<State>,
    next_id: AtomicI64,
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            next_id: AtomicI64::new(900_000_000),
        }
    }

    pub fn from_fixture(fixture: PlatformFixture) -> Self {
        let platform = Self::new();
        for guild in fixture.guilds {
            platform.insert_guild(guild.id, guild.bot_position);
            for role in guild.roles {
                platform.insert_role(Role::new(role.id, guild.id, role.name, role.position));
            }
            for member in guild.members {
                platform.insert_member(guild.id, member);
            }
        }
        platform
    }

    // === Setup ===

    pub fn insert_guild(&self, guild_id: Snowflake, bot_position: i32) {
        self.state.lock().guilds.insert(
            guild_id,
            GuildState {
                bot_position,
                ..GuildState::default()
            },
        );
    }

    /// Add a role to its guild, creating the guild if needed
    pub fn insert_role(&self, role: Role) {
        let mut state = self.state.lock();
        let guild = state.guilds.entry(role.guild_id).or_insert_with(|| GuildState {
            bot_position: default_bot_position(),
            ..GuildState::default()
        });
        guild.roles.retain(|r| r.id != role.id);
        guild.roles.push(role);
    }

    /// Delete a role and strip it from every member
    pub fn delete_guild_role(&self, guild_id: Snowflake, role_id: Snowflake) {
        if let Some(guild) = self.state.lock().guilds.get_mut(&guild_id) {
            guild.roles.retain(|r| r.id != role_id);
            for roles in guild.members.values_mut() {
                roles.remove(&role_id);
            }
        }
    }

    pub fn insert_member(&self, guild_id: Snowflake, user_id: Snowflake) {
        if let Some(guild) = self.state.lock().guilds.get_mut(&guild_id) {
            guild.members.entry(user_id).or_default();
        }
    }

    pub fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) {
        if let Some(guild) = self.state.lock().guilds.get_mut(&guild_id) {
            guild.members.remove(&user_id);
        }
    }

    pub fn set_bot_position(&self, guild_id: Snowflake, position: i32) {
        if let Some(guild) = self.state.lock().guilds.get_mut(&guild_id) {
            guild.bot_position = position;
        }
    }

    /// Make message deletion and channel edits in `channel_id` fail
    pub fn forbid_channel(&self, channel_id: Snowflake) {
        self.state.lock().forbidden_channels.insert(channel_id);
    }

    // === Inspection ===

    /// Every mutating call made so far, in order
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn member_roles(&self, guild_id: Snowflake, user_id: Snowflake) -> Vec<Snowflake> {
        self.state
            .lock()
            .guilds
            .get(&guild_id)
            .and_then(|g| g.members.get(&user_id))
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn has_role(&self, guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> bool {
        self.member_roles(guild_id, user_id).contains(&role_id)
    }

    pub fn channel_name(&self, channel_id: Snowflake) -> Option<String> {
        self.state.lock().channel_names.get(&channel_id).cloned()
    }

    pub fn message_exists(&self, message_id: Snowflake) -> bool {
        self.state.lock().messages.contains_key(&message_id)
    }

    pub fn message_content(&self, message_id: Snowflake) -> Option<String> {
        self.state
            .lock()
            .messages
            .get(&message_id)
            .map(|m| m.content.clone())
    }

    pub fn reactions_on(&self, message_id: Snowflake) -> Vec<String> {
        self.state
            .lock()
            .messages
            .get(&message_id)
            .map(|m| m.reactions.clone())
            .unwrap_or_default()
    }

    /// Messages sent to `channel_id`, oldest first
    pub fn messages_in(&self, channel_id: Snowflake) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                PlatformCall::SendMessage {
                    channel_id: c,
                    content,
                } if *c == channel_id => Some(content.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Platform for MemoryPlatform {
    async fn guild_roles(&self, guild_id: Snowflake) -> PlatformResult<Vec<Role>> {
        Ok(self.state.lock().guild(guild_id)?.roles.clone())
    }

    async fn member_count(&self, guild_id: Snowflake) -> PlatformResult<u64> {
        Ok(self.state.lock().guild(guild_id)?.members.len() as u64)
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<Snowflake> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::SendMessage {
            channel_id,
            content: content.to_string(),
        });

        let message_id = Snowflake::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        state.messages.insert(
            message_id,
            MessageState {
                channel_id,
                content: content.to_string(),
                reactions: Vec::new(),
            },
        );
        Ok(message_id)
    }

    async fn add_reaction(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::AddReaction {
            message_id,
            emoji: emoji.to_string(),
        });

        if !is_valid_emoji(emoji) {
            return Err(PlatformError::UnknownEmoji(emoji.to_string()));
        }
        let message = state
            .messages
            .get_mut(&message_id)
            .ok_or_else(|| PlatformError::not_found("Message", message_id))?;
        if !message.reactions.iter().any(|r| r == emoji) {
            message.reactions.push(emoji.to_string());
        }
        Ok(())
    }

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::DeleteMessage {
            channel_id,
            message_id,
        });

        state.check_channel(channel_id)?;
        let in_channel = state
            .messages
            .get(&message_id)
            .is_some_and(|m| m.channel_id == channel_id);
        if !in_channel {
            return Err(PlatformError::not_found("Message", message_id));
        }

        state.messages.remove(&message_id);
        Ok(())
    }

    async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::AddRole {
            guild_id,
            user_id,
            role_id,
        });

        let guild = state.guild_mut(guild_id)?;
        guild.manageable_role(role_id)?;
        guild.member_roles_mut(user_id)?.insert(role_id);
        Ok(())
    }

    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::RemoveRole {
            guild_id,
            user_id,
            role_id,
        });

        let guild = state.guild_mut(guild_id)?;
        guild.manageable_role(role_id)?;
        guild.member_roles_mut(user_id)?.remove(&role_id);
        Ok(())
    }

    async fn rename_channel(&self, channel_id: Snowflake, name: &str) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::RenameChannel {
            channel_id,
            name: name.to_string(),
        });

        state.check_channel(channel_id)?;
        state.channel_names.insert(channel_id, name.to_string());
        Ok(())
    }
}

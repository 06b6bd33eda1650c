//! Timeout wrapper for platform calls

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rolebot_core::{Platform, PlatformError, PlatformResult, Role, Snowflake};

/// Wraps a platform so that every call fails with `PlatformError::Timeout`
/// once `timeout` elapses.
pub struct TimedPlatform {
    inner: Arc<dyn Platform>,
    timeout: Duration,
}

impl TimedPlatform {
    pub fn new(inner: Arc<dyn Platform>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(&self, call: F) -> PlatformResult<T>
    where
        F: Future<Output = PlatformResult<T>> + Send,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(PlatformError::Timeout))
    }
}

#[async_trait]
impl Platform for TimedPlatform {
    async fn guild_roles(&self, guild_id: Snowflake) -> PlatformResult<Vec<Role>> {
        self.bounded(self.inner.guild_roles(guild_id)).await
    }

    async fn member_count(&self, guild_id: Snowflake) -> PlatformResult<u64> {
        self.bounded(self.inner.member_count(guild_id)).await
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<Snowflake> {
        self.bounded(self.inner.send_message(channel_id, content)).await
    }

    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> PlatformResult<()> {
        self.bounded(self.inner.add_reaction(channel_id, message_id, emoji))
            .await
    }

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<()> {
        self.bounded(self.inner.delete_message(channel_id, message_id))
            .await
    }

    async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        self.bounded(self.inner.add_role(guild_id, user_id, role_id))
            .await
    }

    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        self.bounded(self.inner.remove_role(guild_id, user_id, role_id))
            .await
    }

    async fn rename_channel(&self, channel_id: Snowflake, name: &str) -> PlatformResult<()> {
        self.bounded(self.inner.rename_channel(channel_id, name))
            .await
    }
}

//! Member count channel service
//!
//! A guild may mark one channel whose name tracks the guild's member count.
//! The registry lives in memory for the lifetime of the process.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rolebot_core::{DomainError, MemberEvent, Snowflake};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Guild ID -> member count channel ID
#[derive(Debug, Default)]
pub struct MemberCountChannels {
    channels: DashMap<Snowflake, Snowflake>,
}

impl MemberCountChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Member count channel of `guild_id`, if one is set
    pub fn channel_for(&self, guild_id: Snowflake) -> Option<Snowflake> {
        self.channels.get(&guild_id).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Point `guild_id` at `channel_id` in one step.
    ///
    /// Returns the replaced channel, or `Err` with the channel already set
    /// when it is `channel_id` itself.
    fn claim(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> Result<Option<Snowflake>, Snowflake> {
        match self.channels.entry(guild_id) {
            Entry::Occupied(entry) if *entry.get() == channel_id => Err(channel_id),
            Entry::Occupied(mut entry) => Ok(Some(entry.insert(channel_id))),
            Entry::Vacant(entry) => {
                entry.insert(channel_id);
                Ok(None)
            }
        }
    }

    /// Undo a `claim` of `channel_id`, unless another claim replaced it since
    fn rollback(&self, guild_id: Snowflake, channel_id: Snowflake, previous: Option<Snowflake>) {
        if let Entry::Occupied(mut entry) = self.channels.entry(guild_id) {
            if *entry.get() != channel_id {
                return;
            }
            match previous {
                Some(previous) => {
                    entry.insert(previous);
                }
                None => {
                    entry.remove();
                }
            }
        }
    }

    /// Drop the mapping if it still points at `channel_id`
    fn release(&self, guild_id: Snowflake, channel_id: Snowflake) -> bool {
        self.channels
            .remove_if(&guild_id, |_, current| *current == channel_id)
            .is_some()
    }
}

/// Channel name showing the member count
pub fn member_count_name(count: u64) -> String {
    format!("Total Members: {count}")
}

/// Member count service
pub struct MemberCountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberCountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mark `channel_id` as the member count channel of `guild_id` and
    /// rename it. Replaces any previously marked channel.
    ///
    /// Returns the member count shown.
    #[instrument(skip(self))]
    pub async fn set_member_count(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<u64> {
        let channels = self.ctx.member_counts();
        let previous = channels
            .claim(guild_id, channel_id)
            .map_err(DomainError::AlreadyCountingMembers)?;
        match self.rename(guild_id, channel_id).await {
            Ok(count) => {
                info!(guild_id = %guild_id, channel_id = %channel_id, count, "Member count channel set");
                Ok(count)
            }
            Err(e) => {
                channels.rollback(guild_id, channel_id, previous);
                Err(e)
            }
        }
    }

    /// Stop tracking the member count in `channel_id`
    #[instrument(skip(self))]
    pub async fn remove_member_count(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<()> {
        if !self.ctx.member_counts().release(guild_id, channel_id) {
            return Err(DomainError::NotCountingMembers(channel_id).into());
        }

        info!(guild_id = %guild_id, channel_id = %channel_id, "Member count channel removed");
        Ok(())
    }

    /// Refresh the member count channel after a join or leave.
    ///
    /// Returns `false` when the guild has no member count channel or the
    /// rename failed.
    #[instrument(skip(self, event), fields(guild_id = %event.guild_id))]
    pub async fn on_member_event(&self, event: &MemberEvent) -> bool {
        let Some(channel_id) = self.ctx.member_counts().channel_for(event.guild_id) else {
            return false;
        };

        match self.rename(event.guild_id, channel_id).await {
            Ok(_) => true,
            Err(e) => {
                warn!(channel_id = %channel_id, error = %e, "Failed to update member count channel");
                false
            }
        }
    }

    async fn rename(&self, guild_id: Snowflake, channel_id: Snowflake) -> ServiceResult<u64> {
        let platform = self.ctx.platform();
        let count = platform.member_count(guild_id).await?;
        platform
            .rename_channel(channel_id, &member_count_name(count))
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::platform::MemoryPlatform;
    use crate::services::{BindingManager, ServiceError};
    use rolebot_core::MemberEventKind;
    use rolebot_store::MemoryBindingStore;

    fn sf(id: i64) -> Snowflake {
        Snowflake::new(id)
    }

    fn setup() -> (ServiceContext, Arc<MemoryPlatform>) {
        let platform = Arc::new(MemoryPlatform::new());
        platform.insert_guild(sf(1), 10);
        platform.insert_member(sf(1), sf(5));
        platform.insert_member(sf(1), sf(6));

        let ctx = ServiceContext::builder()
            .bindings(BindingManager::load(Arc::new(MemoryBindingStore::new())).unwrap())
            .platform(platform.clone())
            .bot_user_id(sf(999))
            .build()
            .unwrap();
        (ctx, platform)
    }

    #[tokio::test]
    async fn test_set_renames_channel() {
        let (ctx, platform) = setup();
        let count = MemberCountService::new(&ctx)
            .set_member_count(sf(1), sf(50))
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(platform.channel_name(sf(50)).as_deref(), Some("Total Members: 2"));
        assert_eq!(ctx.member_counts().channel_for(sf(1)), Some(sf(50)));
    }

    #[tokio::test]
    async fn test_set_same_channel_twice_conflicts() {
        let (ctx, _) = setup();
        let service = MemberCountService::new(&ctx);
        service.set_member_count(sf(1), sf(50)).await.unwrap();

        let err = service.set_member_count(sf(1), sf(50)).await.unwrap_err();
        assert_eq!(err.error_code(), "ALREADY_COUNTING_MEMBERS");

        // A different channel replaces the first
        service.set_member_count(sf(1), sf(51)).await.unwrap();
        assert_eq!(ctx.member_counts().channel_for(sf(1)), Some(sf(51)));
    }

    #[tokio::test]
    async fn test_failed_rename_restores_previous_channel() {
        let (ctx, platform) = setup();
        let service = MemberCountService::new(&ctx);
        service.set_member_count(sf(1), sf(50)).await.unwrap();

        platform.forbid_channel(sf(51));
        let err = service.set_member_count(sf(1), sf(51)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Platform(ref e) if e.is_forbidden()));
        assert_eq!(ctx.member_counts().channel_for(sf(1)), Some(sf(50)));
    }

    #[test]
    fn test_rollback_keeps_newer_claim() {
        let channels = MemberCountChannels::new();
        assert_eq!(channels.claim(sf(1), sf(50)), Ok(None));
        assert_eq!(channels.claim(sf(1), sf(50)), Err(sf(50)));

        let previous = channels.claim(sf(1), sf(51)).unwrap();
        assert_eq!(previous, Some(sf(50)));

        // Another claim lands before the first one is rolled back
        assert_eq!(channels.claim(sf(1), sf(52)), Ok(Some(sf(51))));
        channels.rollback(sf(1), sf(51), previous);
        assert_eq!(channels.channel_for(sf(1)), Some(sf(52)));

        channels.rollback(sf(1), sf(52), None);
        assert!(channels.is_empty());

        assert!(!channels.release(sf(1), sf(52)));
    }

    #[tokio::test]
    async fn test_remove() {
        let (ctx, _) = setup();
        let service = MemberCountService::new(&ctx);

        let err = service.remove_member_count(sf(1), sf(50)).await.unwrap_err();
        assert!(err.is_not_found());

        service.set_member_count(sf(1), sf(50)).await.unwrap();
        service.remove_member_count(sf(1), sf(50)).await.unwrap();
        assert!(ctx.member_counts().is_empty());
    }

    #[tokio::test]
    async fn test_member_events_refresh_count() {
        let (ctx, platform) = setup();
        let service = MemberCountService::new(&ctx);

        let joined = MemberEvent {
            guild_id: sf(1),
            user_id: sf(7),
            kind: MemberEventKind::Joined,
        };
        assert!(!service.on_member_event(&joined).await);

        service.set_member_count(sf(1), sf(50)).await.unwrap();
        platform.insert_member(sf(1), sf(7));
        assert!(service.on_member_event(&joined).await);
        assert_eq!(platform.channel_name(sf(50)).as_deref(), Some("Total Members: 3"));

        platform.forbid_channel(sf(50));
        assert!(!service.on_member_event(&joined).await);
    }
}

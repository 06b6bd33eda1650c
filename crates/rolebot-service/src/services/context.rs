//! Service context - dependency container for services
//!
//! Holds the binding manager, the platform client and the member-count
//! channel registry shared by every service and command handler.

use std::sync::Arc;
use std::time::Duration;

use rolebot_core::{Platform, Snowflake};

use super::binding::BindingManager;
use super::error::{ServiceError, ServiceResult};
use super::member_count::MemberCountChannels;
use crate::platform::TimedPlatform;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    bindings: BindingManager,
    platform: Arc<dyn Platform>,
    member_counts: Arc<MemberCountChannels>,
    bot_user_id: Snowflake,
}

impl ServiceContext {
    fn new(
        bindings: BindingManager,
        platform: Arc<dyn Platform>,
        member_counts: Arc<MemberCountChannels>,
        bot_user_id: Snowflake,
    ) -> Self {
        Self {
            bindings,
            platform,
            member_counts,
            bot_user_id,
        }
    }

    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Get the binding manager
    pub fn bindings(&self) -> &BindingManager {
        &self.bindings
    }

    /// Get the platform client
    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    /// Get the member-count channel registry
    pub fn member_counts(&self) -> &MemberCountChannels {
        self.member_counts.as_ref()
    }

    /// The bot's own user ID
    pub fn bot_user_id(&self) -> Snowflake {
        self.bot_user_id
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("bindings", &self.bindings)
            .field("platform", &"dyn Platform")
            .field("member_counts", &self.member_counts.len())
            .field("bot_user_id", &self.bot_user_id)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    bindings: Option<BindingManager>,
    platform: Option<Arc<dyn Platform>>,
    platform_timeout: Option<Duration>,
    member_counts: Option<Arc<MemberCountChannels>>,
    bot_user_id: Option<Snowflake>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(mut self, bindings: BindingManager) -> Self {
        self.bindings = Some(bindings);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Bound every platform call by `timeout`
    pub fn platform_timeout(mut self, timeout: Duration) -> Self {
        self.platform_timeout = Some(timeout);
        self
    }

    pub fn member_counts(mut self, member_counts: Arc<MemberCountChannels>) -> Self {
        self.member_counts = Some(member_counts);
        self
    }

    pub fn bot_user_id(mut self, bot_user_id: Snowflake) -> Self {
        self.bot_user_id = Some(bot_user_id);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let bindings = self
            .bindings
            .ok_or_else(|| ServiceError::validation("bindings is required"))?;
        let platform = self
            .platform
            .ok_or_else(|| ServiceError::validation("platform is required"))?;
        let bot_user_id = self
            .bot_user_id
            .ok_or_else(|| ServiceError::validation("bot_user_id is required"))?;

        let platform: Arc<dyn Platform> = match self.platform_timeout {
            Some(timeout) => Arc::new(TimedPlatform::new(platform, timeout)),
            None => platform,
        };

        Ok(ServiceContext::new(
            bindings,
            platform,
            self.member_counts.unwrap_or_default(),
            bot_user_id,
        ))
    }
}

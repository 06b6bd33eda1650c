//! # rolebot-service
//!
//! Application layer: the reaction-role binding manager and its in-memory
//! index, the reaction event reconciler, the member-count channel service,
//! and platform adapters.

pub mod platform;
pub mod services;

pub use platform::{
    GuildFixture, MemoryPlatform, PlatformCall, PlatformFixture, RoleFixture, TimedPlatform,
};
pub use services::{
    BindingIndex, BindingManager, MemberCountChannels, MemberCountService, ReactionReconciler,
    ReconcileOutcome, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};

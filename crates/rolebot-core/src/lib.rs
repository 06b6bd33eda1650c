//! # rolebot-core
//!
//! Domain layer containing the reaction-role binding entity, platform events,
//! and the ports (store and platform traits) the other crates implement.
//! This crate has zero dependencies on infrastructure (files, network, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Binding, Role};
pub use error::DomainError;
pub use events::{MemberEvent, MemberEventKind, ReactionDirection, ReactionEvent};
pub use traits::{BindingStore, Platform, PlatformError, PlatformResult, StoreError, StoreResult};
pub use value_objects::{Snowflake, SnowflakeParseError};

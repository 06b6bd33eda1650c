//! Ports - interfaces the domain needs from the outside world
//!
//! The store port is implemented by `rolebot-store`; the platform port by the
//! chat platform adapter the bot is hosted in.

mod platform;
mod store;

pub use platform::{Platform, PlatformError, PlatformResult};
pub use store::{BindingStore, StoreError, StoreResult};

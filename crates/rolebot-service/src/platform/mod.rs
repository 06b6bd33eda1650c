//! Platform adapters
//!
//! `TimedPlatform` bounds every call of a real platform client with a
//! timeout. `MemoryPlatform` is a self-contained platform used by tests and
//! the local harness binary.

mod memory;
mod timed;

pub use memory::{GuildFixture, MemoryPlatform, PlatformCall, PlatformFixture, RoleFixture};
pub use timed::TimedPlatform;

//! Platform events consumed by the bot

mod platform_event;

pub use platform_event::{MemberEvent, MemberEventKind, ReactionDirection, ReactionEvent};

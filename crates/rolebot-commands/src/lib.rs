//! # rolebot-commands
//!
//! Command surface: thin handlers that resolve arguments against the
//! platform, call into the binding manager or member count service, and
//! reply to the invoking user.

pub mod handlers;
pub mod invocation;
pub mod response;

pub use handlers::{find_role, CommandHandler};
pub use invocation::{Command, CommandInvocation};
pub use response::{CommandError, CommandResult};

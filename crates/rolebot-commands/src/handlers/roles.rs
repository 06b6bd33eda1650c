//! Role argument resolution

use rolebot_core::{Role, Snowflake};

/// Resolve a role argument against the guild's roles.
///
/// Accepts a role ID, a role mention (`<@&id>`) or the exact role name.
pub fn find_role<'r>(roles: &'r [Role], arg: &str) -> Option<&'r Role> {
    let arg = arg.trim();
    if let Ok(id) = Snowflake::parse_role_mention(arg) {
        if let Some(role) = roles.iter().find(|r| r.id == id) {
            return Some(role);
        }
    }
    roles.iter().find(|r| r.name == arg)
}

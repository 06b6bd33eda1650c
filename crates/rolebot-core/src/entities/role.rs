//! Role entity - a guild role as currently reported by the platform

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    /// Higher position = more authority
    #[serde(default)]
    pub position: i32,
}

impl Role {
    /// Create a new Role
    pub fn new(id: Snowflake, guild_id: Snowflake, name: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            guild_id,
            name: name.into(),
            position,
        }
    }

    /// Whether a member whose highest role sits at `position` may grant or
    /// revoke this role. Only roles strictly below can be managed.
    #[inline]
    pub fn is_manageable_from(&self, position: i32) -> bool {
        self.position < position
    }
}

//! Binding record as stored in the table file

use serde::{Deserialize, Serialize};

/// One row of the binding table.
///
/// Field names are part of the file format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingRecord {
    pub guild_id: i64,
    /// Role display name
    pub name: String,
    pub role_id: i64,
    pub emoji: String,
    pub msg_id: i64,
}

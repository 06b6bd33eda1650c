//! Binding record mapper

use rolebot_core::{Binding, Snowflake};

use crate::models::BindingRecord;

impl From<BindingRecord> for Binding {
    fn from(record: BindingRecord) -> Self {
        Self {
            guild_id: Snowflake::new(record.guild_id),
            message_id: Snowflake::new(record.msg_id),
            emoji: record.emoji,
            role_id: Snowflake::new(record.role_id),
            role_name: record.name,
        }
    }
}

impl From<&Binding> for BindingRecord {
    fn from(binding: &Binding) -> Self {
        Self {
            guild_id: binding.guild_id.into_inner(),
            name: binding.role_name.clone(),
            role_id: binding.role_id.into_inner(),
            emoji: binding.emoji.clone(),
            msg_id: binding.message_id.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_entity_field_mapping() {
        let record = BindingRecord {
            guild_id: 1,
            name: "Verified".to_string(),
            role_id: 7,
            emoji: "✅".to_string(),
            msg_id: 100,
        };
        let binding = Binding::from(record);
        assert_eq!(binding.guild_id, Snowflake::new(1));
        assert_eq!(binding.message_id, Snowflake::new(100));
        assert_eq!(binding.role_id, Snowflake::new(7));
        assert_eq!(binding.role_name, "Verified");
        assert_eq!(binding.emoji, "✅");
    }
}

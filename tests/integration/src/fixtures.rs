//! Test fixtures
//!
//! One guild with a manageable role, a role above the bot, and two members.

use rolebot_core::Snowflake;
use rolebot_service::{GuildFixture, PlatformFixture, RoleFixture};

pub const GUILD_ID: i64 = 1;
pub const OTHER_GUILD_ID: i64 = 2;
pub const CHANNEL_ID: i64 = 50;
pub const BOT_USER_ID: i64 = 999;
pub const ADMIN_USER_ID: i64 = 3;
pub const MEMBER_ID: i64 = 5;
pub const OTHER_MEMBER_ID: i64 = 6;

/// Role the bot can manage
pub const VERIFIED_ROLE_ID: i64 = 7;
/// Role above the bot's highest role
pub const ADMIN_ROLE_ID: i64 = 8;

pub fn sf(id: i64) -> Snowflake {
    Snowflake::new(id)
}

pub fn platform_fixture() -> PlatformFixture {
    PlatformFixture {
        guilds: vec![
            GuildFixture {
                id: sf(GUILD_ID),
                roles: vec![
                    RoleFixture {
                        id: sf(VERIFIED_ROLE_ID),
                        name: "Verified".to_string(),
                        position: 1,
                    },
                    RoleFixture {
                        id: sf(ADMIN_ROLE_ID),
                        name: "Admin".to_string(),
                        position: 50,
                    },
                ],
                members: vec![sf(ADMIN_USER_ID), sf(MEMBER_ID), sf(OTHER_MEMBER_ID)],
                bot_position: 10,
            },
            GuildFixture {
                id: sf(OTHER_GUILD_ID),
                roles: vec![RoleFixture {
                    id: sf(VERIFIED_ROLE_ID),
                    name: "Verified".to_string(),
                    position: 1,
                }],
                members: vec![sf(MEMBER_ID)],
                bot_position: 10,
            },
        ],
    }
}

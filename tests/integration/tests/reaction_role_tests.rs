//! Reaction role integration tests
//!
//! Run with: cargo test -p integration-tests --test reaction_role_tests

use std::sync::Arc;

use integration_tests::*;
use rolebot_commands::Command;
use rolebot_gateway::{source, DispatchOutcome, DispatcherConfig, GatewayEvent};
use rolebot_service::{PlatformCall, ReconcileOutcome};
use tokio::io::BufReader;
use tokio::sync::mpsc;

// ============================================================================
// Reconciliation
// ============================================================================

#[tokio::test]
async fn test_verified_role_scenario() {
    let bot = TestBot::start().unwrap();
    bot.bind(100, "✅", VERIFIED_ROLE_ID, "Verified").await.unwrap();

    let outcome = bot.react(100, MEMBER_ID, "✅").await;
    assert_eq!(
        outcome,
        DispatchOutcome::Reaction(ReconcileOutcome::Granted {
            role_id: sf(VERIFIED_ROLE_ID)
        })
    );
    assert!(bot.platform.has_role(sf(GUILD_ID), sf(MEMBER_ID), sf(VERIFIED_ROLE_ID)));

    let outcome = bot.unreact(100, MEMBER_ID, "✅").await;
    assert_eq!(
        outcome,
        DispatchOutcome::Reaction(ReconcileOutcome::Revoked {
            role_id: sf(VERIFIED_ROLE_ID)
        })
    );
    assert!(!bot.platform.has_role(sf(GUILD_ID), sf(MEMBER_ID), sf(VERIFIED_ROLE_ID)));

    bot.platform.clear_calls();
    let outcome = bot.react(100, MEMBER_ID, "🔥").await;
    assert_eq!(outcome, DispatchOutcome::Reaction(ReconcileOutcome::Ignored));
    assert!(bot.platform.calls().is_empty());
}

#[tokio::test]
async fn test_role_above_bot_is_reported_and_binding_kept() {
    let bot = TestBot::start().unwrap();
    bot.bind(101, "👑", ADMIN_ROLE_ID, "Admin").await.unwrap();

    let outcome = bot.react(101, MEMBER_ID, "👑").await;
    assert!(matches!(
        outcome,
        DispatchOutcome::Reaction(ReconcileOutcome::Forbidden { .. })
    ));
    assert!(!bot.platform.has_role(sf(GUILD_ID), sf(MEMBER_ID), sf(ADMIN_ROLE_ID)));
    assert_eq!(bot.stored_table().unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleted_role_is_reported() {
    let bot = TestBot::start().unwrap();
    bot.bind(100, "✅", VERIFIED_ROLE_ID, "Verified").await.unwrap();
    bot.platform.delete_guild_role(sf(GUILD_ID), sf(VERIFIED_ROLE_ID));

    let outcome = bot.react(100, MEMBER_ID, "✅").await;
    assert_eq!(
        outcome,
        DispatchOutcome::Reaction(ReconcileOutcome::RoleMissing {
            role_id: sf(VERIFIED_ROLE_ID)
        })
    );
}

// ============================================================================
// Commands and persistence
// ============================================================================

#[tokio::test]
async fn test_reactrole_persists_and_survives_restart() {
    let mut bot = TestBot::start().unwrap();
    assert_eq!(bot.react_role("✅", "<@&7>", "React to get verified").await, None);
    let message_id = bot.last_bound_message().unwrap();

    let table = bot.stored_table().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[0]["guild_id"], GUILD_ID);
    assert_eq!(table[0]["name"], "Verified");
    assert_eq!(table[0]["role_id"], VERIFIED_ROLE_ID);
    assert_eq!(table[0]["emoji"], "✅");
    assert_eq!(table[0]["msg_id"], message_id);

    bot.restart().unwrap();
    assert_eq!(bot.last_bound_message(), Some(message_id));

    let outcome = bot.react(message_id, MEMBER_ID, "✅").await;
    assert!(matches!(
        outcome,
        DispatchOutcome::Reaction(ReconcileOutcome::Granted { .. })
    ));
}

#[tokio::test]
async fn test_removing_unknown_reaction_role_leaves_table_unchanged() {
    let bot = TestBot::start().unwrap();
    bot.react_role("✅", "Verified", "Pick").await;
    let before = std::fs::read(bot.store_path()).unwrap();

    let reply = bot.remove_react_role("Admin").await.unwrap();
    assert_eq!(
        reply,
        ":x: <@3>: **Admin** either doesn't exist, or isn't a reaction role on this server."
    );
    assert_eq!(std::fs::read(bot.store_path()).unwrap(), before);
}

#[tokio::test]
async fn test_removereactrole_deletes_message_and_binding() {
    let mut bot = TestBot::start().unwrap();
    bot.react_role("✅", "Verified", "Pick").await;
    let message_id = bot.last_bound_message().unwrap();

    let reply = bot.remove_react_role("Verified").await.unwrap();
    assert_eq!(reply, "👍🏻 Done. 🔧 Removed 'Verified'.");
    assert!(!bot.platform.message_exists(sf(message_id)));
    assert!(bot.stored_table().unwrap().is_empty());

    bot.restart().unwrap();
    let outcome = bot.react(message_id, MEMBER_ID, "✅").await;
    assert_eq!(outcome, DispatchOutcome::Reaction(ReconcileOutcome::Ignored));
}

#[tokio::test]
async fn test_invalid_emoji_cleans_up() {
    let bot = TestBot::start().unwrap();
    let reply = bot.react_role("banana", "Verified", "Pick").await.unwrap();

    assert_eq!(reply, ":x: <@3>: Sorry, that emoji is invalid.");
    assert!(bot.stored_table().unwrap().is_empty());
    assert!(bot
        .platform
        .calls()
        .iter()
        .any(|call| matches!(call, PlatformCall::DeleteMessage { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_are_both_persisted() {
    let mut bot = TestBot::start().unwrap();

    let (first, second) = futures::join!(
        bot.react_role("✅", "Verified", "First"),
        bot.react_role("🔥", "Verified", "Second"),
    );
    assert_eq!((first, second), (None, None));

    bot.restart().unwrap();
    let table = bot.stored_table().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(bot.dispatcher.context().bindings().snapshot().len(), 2);
}

#[tokio::test]
async fn test_strict_mode_rejects_duplicate_binding() {
    let bot = TestBot::start_with(true).unwrap();
    bot.bind(100, "✅", VERIFIED_ROLE_ID, "Verified").await.unwrap();

    assert!(bot.bind(100, "✅", ADMIN_ROLE_ID, "Admin").await.is_err());
    assert_eq!(bot.stored_table().unwrap().len(), 1);
}

// ============================================================================
// Member count channel
// ============================================================================

#[tokio::test]
async fn test_member_count_channel_tracks_joins() {
    let bot = TestBot::start().unwrap();

    let reply = bot.command(Command::SetMemberCount).await.unwrap();
    assert_eq!(reply, "✅ This channel has been set as the member count channel.");
    assert_eq!(
        bot.platform.channel_name(sf(CHANNEL_ID)).as_deref(),
        Some("Total Members: 3")
    );

    let outcome = bot.member_joined(42).await;
    assert_eq!(outcome, DispatchOutcome::MemberCount { refreshed: true });
    assert_eq!(
        bot.platform.channel_name(sf(CHANNEL_ID)).as_deref(),
        Some("Total Members: 4")
    );
}

// ============================================================================
// Event stream
// ============================================================================

#[tokio::test]
async fn test_ndjson_stream_through_dispatcher() {
    let bot = TestBot::start().unwrap();
    bot.bind(100, "✅", VERIFIED_ROLE_ID, "Verified").await.unwrap();

    let add = serde_json::to_string(&GatewayEvent::MessageReactionAdd(reaction(100, MEMBER_ID, "✅"))).unwrap();
    let other = serde_json::to_string(&GatewayEvent::MessageReactionAdd(reaction(
        100,
        OTHER_MEMBER_ID,
        "✅",
    )))
    .unwrap();
    let input = format!("{add}\n{{broken\n{other}\n");

    let (events, receiver) = mpsc::channel(8);
    let runner = tokio::spawn(Arc::clone(&bot.dispatcher).run(receiver, DispatcherConfig::default()));
    let forwarded = source::forward_lines(BufReader::new(input.as_bytes()), events)
        .await
        .unwrap();

    assert_eq!(forwarded, 2);
    assert_eq!(runner.await.unwrap(), 2);
    assert!(bot.platform.has_role(sf(GUILD_ID), sf(MEMBER_ID), sf(VERIFIED_ROLE_ID)));
    assert!(bot.platform.has_role(sf(GUILD_ID), sf(OTHER_MEMBER_ID), sf(VERIFIED_ROLE_ID)));
}

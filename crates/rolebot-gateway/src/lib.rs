//! # rolebot-gateway
//!
//! Receives platform events, routes them to the reconciler, the member
//! count service or the command surface, and runs the local harness that
//! reads events as newline-delimited JSON.

pub mod dispatch;
pub mod error;
pub mod events;
pub mod source;

use std::path::Path;
use std::sync::Arc;

use rolebot_common::AppConfig;
use rolebot_service::{BindingManager, MemoryPlatform, PlatformFixture, ServiceContext};
use rolebot_store::JsonBindingStore;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;

pub use dispatch::{DispatchOutcome, DispatcherConfig, EventDispatcher};
pub use error::{GatewayError, GatewayResult};
pub use events::{GatewayEvent, MemberPayload, ReactionPayload};

/// Build the service context described by `config`
pub fn build_context(config: &AppConfig, platform: Arc<MemoryPlatform>) -> GatewayResult<ServiceContext> {
    let store = Arc::new(JsonBindingStore::new(&config.store.path));
    if config.store.init {
        store.init()?;
    }

    let bindings = BindingManager::load_strict(store, config.bot.strict_bindings)?;

    let ctx = ServiceContext::builder()
        .bindings(bindings)
        .platform(platform)
        .platform_timeout(config.bot.platform_timeout())
        .bot_user_id(config.bot.user_id)
        .build()?;
    Ok(ctx)
}

/// Load the platform fixture, or start from an empty platform
pub fn load_platform(fixture: Option<&Path>) -> GatewayResult<MemoryPlatform> {
    let Some(path) = fixture else {
        return Ok(MemoryPlatform::new());
    };

    let bytes = std::fs::read(path).map_err(|source| GatewayError::FixtureRead {
        path: path.to_path_buf(),
        source,
    })?;
    let fixture: PlatformFixture =
        serde_json::from_slice(&bytes).map_err(|source| GatewayError::FixtureFormat {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), guilds = fixture.guilds.len(), "Platform fixture loaded");
    Ok(MemoryPlatform::from_fixture(fixture))
}

/// Run the harness: dispatch events read from stdin until it closes.
///
/// Returns the number of events handled.
pub async fn run(config: AppConfig) -> GatewayResult<u64> {
    let platform = Arc::new(load_platform(config.bot.platform_fixture.as_deref())?);
    let ctx = build_context(&config, platform)?;
    info!(bindings = ctx.bindings().snapshot().len(), "Service context ready");

    let dispatcher = Arc::new(EventDispatcher::new(ctx, config.bot.command_prefix.clone()));
    let dispatcher_config = DispatcherConfig {
        buffer: config.bot.event_buffer,
        ..DispatcherConfig::default()
    };

    let (events, receiver) = mpsc::channel(dispatcher_config.buffer.max(1));
    let reader = tokio::spawn(source::forward_lines(
        BufReader::new(tokio::io::stdin()),
        events,
    ));

    let handled = dispatcher.run(receiver, dispatcher_config).await;
    let forwarded = reader.await.map_err(|e| GatewayError::Task(e.to_string()))??;
    info!(forwarded, handled, "Event source closed");

    Ok(handled)
}

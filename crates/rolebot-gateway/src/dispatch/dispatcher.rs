//! Event dispatcher
//!
//! Routes each event to its handler. `run` spreads events over a fixed set
//! of worker lanes keyed by guild, so events of one guild are handled in
//! arrival order while different guilds proceed concurrently.

use std::sync::Arc;

use rolebot_commands::CommandHandler;
use rolebot_core::{MemberEventKind, ReactionDirection};
use rolebot_service::{MemberCountService, ReactionReconciler, ReconcileOutcome, ServiceContext};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::events::GatewayEvent;

/// Configuration for the event dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Capacity of the inbound and per-lane queues
    pub buffer: usize,
    /// Number of worker lanes
    pub workers: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            buffer: 1024,
            workers: 8,
        }
    }
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Reaction(ReconcileOutcome),
    MemberCount { refreshed: bool },
    Command { reply: Option<String> },
}

/// Event dispatcher
pub struct EventDispatcher {
    ctx: ServiceContext,
    prefix: String,
}

impl EventDispatcher {
    pub fn new(ctx: ServiceContext, prefix: impl Into<String>) -> Self {
        Self {
            ctx,
            prefix: prefix.into(),
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Handle a single event
    pub async fn dispatch(&self, event: GatewayEvent) -> DispatchOutcome {
        debug!(event_type = event.event_type(), guild_id = %event.guild_id(), "Dispatching event");

        match event {
            GatewayEvent::MessageReactionAdd(payload) => {
                let event = payload.into_event(ReactionDirection::Add);
                DispatchOutcome::Reaction(ReactionReconciler::new(&self.ctx).reconcile(&event).await)
            }
            GatewayEvent::MessageReactionRemove(payload) => {
                let event = payload.into_event(ReactionDirection::Remove);
                DispatchOutcome::Reaction(ReactionReconciler::new(&self.ctx).reconcile(&event).await)
            }
            GatewayEvent::GuildMemberAdd(payload) => {
                let event = payload.into_event(MemberEventKind::Joined);
                let refreshed = MemberCountService::new(&self.ctx).on_member_event(&event).await;
                DispatchOutcome::MemberCount { refreshed }
            }
            GatewayEvent::GuildMemberRemove(payload) => {
                let event = payload.into_event(MemberEventKind::Left);
                let refreshed = MemberCountService::new(&self.ctx).on_member_event(&event).await;
                DispatchOutcome::MemberCount { refreshed }
            }
            GatewayEvent::Command(invocation) => {
                let reply = CommandHandler::new(&self.ctx, &self.prefix)
                    .handle(&invocation)
                    .await;
                DispatchOutcome::Command { reply }
            }
        }
    }

    /// Consume events until the sender side closes and every lane drains.
    ///
    /// Returns the number of events handled.
    pub async fn run(
        self: Arc<Self>,
        mut events: mpsc::Receiver<GatewayEvent>,
        config: DispatcherConfig,
    ) -> u64 {
        let workers = config.workers.max(1);
        let mut lanes = Vec::with_capacity(workers);
        let mut tasks = JoinSet::new();

        for _ in 0..workers {
            let (lane, mut queue) = mpsc::channel::<GatewayEvent>(config.buffer.max(1));
            let dispatcher = Arc::clone(&self);
            tasks.spawn(async move {
                let mut handled = 0u64;
                while let Some(event) = queue.recv().await {
                    dispatcher.dispatch(event).await;
                    handled += 1;
                }
                handled
            });
            lanes.push(lane);
        }
        info!(workers, "Event dispatcher started");

        while let Some(event) = events.recv().await {
            let lane = lane_for(&event, workers);
            if lanes[lane].send(event).await.is_err() {
                warn!(lane, "Event lane closed, dropping event");
            }
        }
        drop(lanes);

        let mut handled = 0;
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(count) => handled += count,
                Err(e) => error!(error = %e, "Event lane failed"),
            }
        }

        info!(handled, "Event dispatcher stopped");
        handled
    }
}

fn lane_for(event: &GatewayEvent, workers: usize) -> usize {
    (event.guild_id().into_inner().unsigned_abs() % workers as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MemberPayload, ReactionPayload};
    use rolebot_core::{Role, Snowflake};
    use rolebot_service::{BindingManager, MemoryPlatform};
    use rolebot_store::MemoryBindingStore;

    fn sf(id: i64) -> Snowflake {
        Snowflake::new(id)
    }

    async fn dispatcher() -> (Arc<EventDispatcher>, Arc<MemoryPlatform>) {
        let platform = Arc::new(MemoryPlatform::new());
        for guild in 1..=3 {
            platform.insert_guild(sf(guild), 10);
            platform.insert_role(Role::new(sf(guild * 10 + 7), sf(guild), "Verified", 1));
            platform.insert_member(sf(guild), sf(5));
        }

        let bindings = BindingManager::load(Arc::new(MemoryBindingStore::new())).unwrap();
        for guild in 1..=3 {
            bindings
                .create_binding(sf(guild), sf(guild * 100), "✅", sf(guild * 10 + 7), "Verified")
                .await
                .unwrap();
        }

        let ctx = ServiceContext::builder()
            .bindings(bindings)
            .platform(platform.clone())
            .bot_user_id(sf(999))
            .build()
            .unwrap();
        (Arc::new(EventDispatcher::new(ctx, "~")), platform)
    }

    fn reaction(guild: i64, add: bool) -> GatewayEvent {
        let payload = ReactionPayload {
            guild_id: sf(guild),
            channel_id: None,
            message_id: sf(guild * 100),
            user_id: sf(5),
            emoji: "✅".to_string(),
        };
        if add {
            GatewayEvent::MessageReactionAdd(payload)
        } else {
            GatewayEvent::MessageReactionRemove(payload)
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_reactions() {
        let (dispatcher, platform) = dispatcher().await;
        let outcome = dispatcher.dispatch(reaction(1, true)).await;

        assert_eq!(
            outcome,
            DispatchOutcome::Reaction(ReconcileOutcome::Granted { role_id: sf(17) })
        );
        assert!(platform.has_role(sf(1), sf(5), sf(17)));
    }

    #[tokio::test]
    async fn test_dispatch_member_event_without_channel() {
        let (dispatcher, _) = dispatcher().await;
        let outcome = dispatcher
            .dispatch(GatewayEvent::GuildMemberAdd(MemberPayload {
                guild_id: sf(1),
                user_id: sf(6),
            }))
            .await;
        assert_eq!(outcome, DispatchOutcome::MemberCount { refreshed: false });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_keeps_guild_order() {
        let (dispatcher, platform) = dispatcher().await;
        let config = DispatcherConfig {
            buffer: 16,
            workers: 2,
        };
        let (events, receiver) = mpsc::channel(16);

        let runner = tokio::spawn(Arc::clone(&dispatcher).run(receiver, config));
        for guild in 1..=3 {
            events.send(reaction(guild, true)).await.unwrap();
            events.send(reaction(guild, false)).await.unwrap();
            events.send(reaction(guild, true)).await.unwrap();
        }
        drop(events);

        assert_eq!(runner.await.unwrap(), 9);
        for guild in 1..=3 {
            assert_eq!(platform.member_roles(sf(guild), sf(5)), vec![sf(guild * 10 + 7)]);
        }
    }
}

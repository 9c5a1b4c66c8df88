// Shared test doubles for the dispatch and handler tests.

use super::command_handler::{
    CommandHandler, DeliveryError, DirectoryError, MemberDirectory, MemberProfile, MessageSink,
};
use super::command_models::{MembershipEvent, MessageEvent, OutboundMessage, ReplyTarget};
use super::command_registry::{
    default_descriptors, CommandDescriptor, CommandRegistry, HandlerVariant,
};
use super::dispatch_engine::{DispatchEngine, DispatchSettings};
use super::handlers::bot_information::{BotInformationHandler, LatencyProbe, ProbeError};
use super::handlers::leaderboard::LeaderboardHandler;
use super::handlers::level::LevelHandler;
use super::handlers::membership::{LeaveHandler, WelcomeHandler};
use super::handlers::ping::PingHandler;
use crate::core::leveling::{LevelingService, Progression, SharedLedgerStore};
use crate::infra::leveling::InMemoryLedgerStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<OutboundMessage>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Failed("channel gone".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct StaticDirectory {
    profiles: HashMap<u64, MemberProfile>,
    communities: usize,
    broken: bool,
}

impl StaticDirectory {
    pub fn with_profile(mut self, member_id: u64, name: &str) -> Self {
        self.profiles.insert(
            member_id,
            MemberProfile {
                member_id,
                display_name: name.to_string(),
                avatar_url: Some(format!("https://cdn.example/{}.png", member_id)),
            },
        );
        self
    }

    pub fn with_communities(mut self, count: usize) -> Self {
        self.communities = count;
        self
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl MemberDirectory for StaticDirectory {
    async fn member_profile(
        &self,
        _community_id: u64,
        member_id: u64,
    ) -> Result<Option<MemberProfile>, DirectoryError> {
        if self.broken {
            return Err(DirectoryError::Lookup("HTTP 503".to_string()));
        }
        Ok(self.profiles.get(&member_id).cloned())
    }

    fn community_count(&self) -> usize {
        self.communities
    }
}

pub struct FixedProbe(pub Option<Duration>);

#[async_trait]
impl LatencyProbe for FixedProbe {
    async fn round_trip(&self) -> Result<Duration, ProbeError> {
        self.0
            .ok_or_else(|| ProbeError("connection refused".to_string()))
    }
}

/// Member 7 ("alice") posting in channel 10 of community 1.
pub fn human_message(content: &str) -> MessageEvent {
    MessageEvent {
        sender_id: 7,
        sender_name: "alice".to_string(),
        sender_is_automated: false,
        content: content.to_string(),
        community_id: Some(1),
        reply_target: ReplyTarget {
            channel_id: 10,
            message_id: 20,
        },
    }
}

/// Member 8 ("bob") joining community 1 as its third member.
pub fn joining_member() -> MembershipEvent {
    MembershipEvent {
        member_id: 8,
        member_name: "bob".to_string(),
        member_is_automated: false,
        community_id: 1,
        community_name: "Rustaceans".to_string(),
        member_count: Some(3),
    }
}

pub fn leveling_with(
    store: SharedLedgerStore,
    level_base: u64,
) -> LevelingService<SharedLedgerStore> {
    LevelingService::new(store, Progression::new(level_base).unwrap())
}

pub struct EngineBuilder {
    store: Arc<InMemoryLedgerStore>,
    store_override: Option<SharedLedgerStore>,
    level_base: u64,
    xp_enabled: bool,
    descriptors: Vec<CommandDescriptor>,
    handlers: HashMap<HandlerVariant, Arc<dyn CommandHandler>>,
    welcome_channel: Option<u64>,
    leave_channel: Option<u64>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        let mut handlers: HashMap<HandlerVariant, Arc<dyn CommandHandler>> = HashMap::new();
        handlers.insert(HandlerVariant::Ping, Arc::new(PingHandler));
        handlers.insert(
            HandlerVariant::BotInformation,
            Arc::new(BotInformationHandler::new(
                FixedProbe(Some(Duration::from_millis(42))),
                Some("ferris".to_string()),
                chrono::Utc::now(),
            )),
        );
        handlers.insert(HandlerVariant::Level, Arc::new(LevelHandler));
        handlers.insert(HandlerVariant::Leaderboard, Arc::new(LeaderboardHandler));

        Self {
            store: Arc::new(InMemoryLedgerStore::new()),
            store_override: None,
            level_base: 100,
            xp_enabled: true,
            descriptors: default_descriptors(),
            handlers,
            welcome_channel: None,
            leave_channel: None,
        }
    }

    pub fn store(&self) -> Arc<InMemoryLedgerStore> {
        Arc::clone(&self.store)
    }

    pub fn store_override(mut self, store: SharedLedgerStore) -> Self {
        self.store_override = Some(store);
        self
    }

    pub fn level_base(mut self, level_base: u64) -> Self {
        self.level_base = level_base;
        self
    }

    pub fn xp_enabled(mut self, enabled: bool) -> Self {
        self.xp_enabled = enabled;
        self
    }

    pub fn descriptors(mut self, descriptors: Vec<CommandDescriptor>) -> Self {
        self.descriptors = descriptors;
        self
    }

    pub fn handler(mut self, variant: HandlerVariant, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(variant, handler);
        self
    }

    pub fn welcome_channel(mut self, channel_id: Option<u64>) -> Self {
        self.welcome_channel = channel_id;
        self
    }

    pub fn leave_channel(mut self, channel_id: Option<u64>) -> Self {
        self.leave_channel = channel_id;
        self
    }

    pub fn build(self) -> DispatchEngine {
        let store = self.store_override.unwrap_or(self.store);
        let registry = CommandRegistry::build(self.descriptors, &self.handlers).unwrap();

        DispatchEngine::new(
            registry,
            Arc::new(leveling_with(store, self.level_base)),
            Arc::new(WelcomeHandler::new(self.welcome_channel)),
            Arc::new(LeaveHandler::new(self.leave_channel)),
            DispatchSettings {
                prefix: "!".to_string(),
                xp_enabled: self.xp_enabled,
                xp_factor: 1,
            },
        )
    }
}

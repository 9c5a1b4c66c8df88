// The seams between the dispatch engine and everything it talks to.
//
// Handlers never call the platform directly to send anything: they return
// the messages they want sent and the engine delivers them. That keeps the
// handlers testable and lets the engine isolate delivery failures.

use super::command_models::{MembershipEvent, MessageEvent, OutboundMessage};
use crate::core::leveling::{LevelingError, LevelingService, SharedLedgerStore};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Leveling error: {0}")]
    Leveling(#[from] LevelingError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Profile lookup failed: {0}")]
    Lookup(String),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Delivery failed: {0}")]
    Failed(String),
}

/// Display data for a member, fetched from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub member_id: u64,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Read-only lookups against the chat platform.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// `Ok(None)` when the member is not (or no longer) in the community.
    async fn member_profile(
        &self,
        community_id: u64,
        member_id: u64,
    ) -> Result<Option<MemberProfile>, DirectoryError>;

    /// Number of communities the bot is currently in.
    fn community_count(&self) -> usize;
}

/// Outbound side of the platform.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

/// What a handler may touch while it runs.
pub struct HandlerContext<'a> {
    pub leveling: &'a LevelingService<SharedLedgerStore>,
    pub directory: &'a dyn MemberDirectory,
}

/// A command triggered by a prefixed chat message.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(
        &self,
        ctx: &HandlerContext<'_>,
        event: &MessageEvent,
    ) -> Result<Vec<OutboundMessage>, HandlerError>;
}

/// Reaction to a member joining or leaving.
#[async_trait]
pub trait MembershipHandler: Send + Sync {
    async fn execute(
        &self,
        ctx: &HandlerContext<'_>,
        event: &MembershipEvent,
    ) -> Result<Vec<OutboundMessage>, HandlerError>;
}

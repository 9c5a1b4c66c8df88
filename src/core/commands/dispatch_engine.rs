// The dispatch engine - one pass per inbound event, no retries.
//
// Order for a chat message:
// 1. drop it if an automated account sent it
// 2. award XP (the ledger write finishes before anything is sent)
// 3. announce a level-up, if the award produced one
// 4. run every command whose trigger matches the prefixed content
//
// Membership events skip 2-4 and go to the welcome / leave handlers.
//
// Handler and delivery failures are logged and counted; they never stop the
// remaining handlers. A ledger failure is returned to the caller once the
// command branch has run, so it cannot go unnoticed.

use super::command_handler::{HandlerContext, MemberDirectory, MembershipHandler, MessageSink};
use super::command_models::{InboundEvent, MembershipEvent, MessageEvent, OutboundMessage};
use super::command_registry::CommandRegistry;
use super::handlers::level_up::level_up_notice;
use crate::core::leveling::{LevelingError, LevelingService, SharedLedgerStore, XpAward};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("XP award failed for member {member_id} in community {community_id}: {source}")]
    Ledger {
        community_id: u64,
        member_id: u64,
        #[source]
        source: LevelingError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub prefix: String,
    pub xp_enabled: bool,
    pub xp_factor: u64,
}

/// What happened while handling one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub filtered: bool,
    pub award: Option<XpAward>,
    pub handlers_fired: usize,
    pub handler_failures: usize,
    pub delivered: usize,
    pub delivery_failures: usize,
}

/// Strip exactly one leading copy of `prefix`, compared literally.
/// `None` when the content does not start with it.
pub fn command_token<'a>(content: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    content.strip_prefix(prefix)
}

pub struct DispatchEngine {
    registry: CommandRegistry,
    leveling: Arc<LevelingService<SharedLedgerStore>>,
    welcome: Arc<dyn MembershipHandler>,
    leave: Arc<dyn MembershipHandler>,
    settings: DispatchSettings,
}

impl DispatchEngine {
    pub fn new(
        registry: CommandRegistry,
        leveling: Arc<LevelingService<SharedLedgerStore>>,
        welcome: Arc<dyn MembershipHandler>,
        leave: Arc<dyn MembershipHandler>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            registry,
            leveling,
            welcome,
            leave,
            settings,
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub async fn dispatch(
        &self,
        event: &InboundEvent,
        directory: &dyn MemberDirectory,
        sink: &dyn MessageSink,
    ) -> Result<DispatchReport, DispatchError> {
        let mut report = DispatchReport::default();

        if event.is_from_automated() {
            tracing::debug!("Ignoring event from automated sender");
            report.filtered = true;
            return Ok(report);
        }

        let ctx = HandlerContext {
            leveling: &self.leveling,
            directory,
        };

        match event {
            InboundEvent::Message(message) => {
                self.dispatch_message(&ctx, message, sink, &mut report).await?;
            }
            InboundEvent::MemberJoined(member) => {
                run_membership(&ctx, &*self.welcome, "welcome", member, sink, &mut report).await;
            }
            InboundEvent::MemberLeft(member) => {
                run_membership(&ctx, &*self.leave, "leave", member, sink, &mut report).await;
            }
        }

        Ok(report)
    }

    async fn dispatch_message(
        &self,
        ctx: &HandlerContext<'_>,
        message: &MessageEvent,
        sink: &dyn MessageSink,
        report: &mut DispatchReport,
    ) -> Result<(), DispatchError> {
        let award = self.award_xp(message).await;

        if let Ok(Some(XpAward {
            level_up: Some(level_up),
            ..
        })) = &award
        {
            tracing::info!(
                member_id = level_up.member_id,
                community_id = level_up.community_id,
                old_level = level_up.old_level,
                new_level = level_up.new_level,
                total_xp = level_up.total_xp,
                "Member leveled up"
            );
            let notice = level_up_notice(
                self.leveling.progression(),
                level_up,
                message.reply_target.channel_id,
            );
            deliver(sink, &notice, report).await;
        }

        if let Some(token) = command_token(&message.content, &self.settings.prefix) {
            for command in self.registry.lookup(token) {
                report.handlers_fired += 1;
                match command.handler.execute(ctx, message).await {
                    Ok(outbound) => {
                        for reply in &outbound {
                            deliver(sink, reply, report).await;
                        }
                    }
                    Err(e) => {
                        report.handler_failures += 1;
                        tracing::warn!(
                            command = %command.variant,
                            trigger = %command.trigger,
                            "Command handler failed: {}",
                            e
                        );
                    }
                }
            }
        }

        report.award = award?;
        Ok(())
    }

    async fn award_xp(&self, message: &MessageEvent) -> Result<Option<XpAward>, DispatchError> {
        if !self.settings.xp_enabled {
            return Ok(None);
        }
        // No XP in direct messages
        let Some(community_id) = message.community_id else {
            return Ok(None);
        };

        self.leveling
            .award_message_xp(
                community_id,
                message.sender_id,
                &message.content,
                self.settings.xp_factor,
            )
            .await
            .map(Some)
            .map_err(|source| DispatchError::Ledger {
                community_id,
                member_id: message.sender_id,
                source,
            })
    }
}

async fn run_membership(
    ctx: &HandlerContext<'_>,
    handler: &dyn MembershipHandler,
    name: &str,
    member: &MembershipEvent,
    sink: &dyn MessageSink,
    report: &mut DispatchReport,
) {
    report.handlers_fired += 1;
    match handler.execute(ctx, member).await {
        Ok(outbound) => {
            for message in &outbound {
                deliver(sink, message, report).await;
            }
        }
        Err(e) => {
            report.handler_failures += 1;
            tracing::warn!(
                member_id = member.member_id,
                member = %member.member_name,
                community_id = member.community_id,
                "{} handler failed: {}",
                name,
                e
            );
        }
    }
}

async fn deliver(sink: &dyn MessageSink, message: &OutboundMessage, report: &mut DispatchReport) {
    match sink.deliver(message).await {
        Ok(()) => report.delivered += 1,
        Err(e) => {
            report.delivery_failures += 1;
            tracing::warn!("Failed to deliver message: {}", e);
        }
    }
}

// Welcome and farewell messages. Both post into a fixed channel from config
// and do nothing when that channel is not configured.

use super::formatting::ordinal;
use crate::core::commands::command_handler::{HandlerContext, HandlerError, MembershipHandler};
use crate::core::commands::command_models::{mention, MembershipEvent, OutboundMessage};
use async_trait::async_trait;

pub struct WelcomeHandler {
    channel_id: Option<u64>,
}

impl WelcomeHandler {
    pub fn new(channel_id: Option<u64>) -> Self {
        Self { channel_id }
    }
}

#[async_trait]
impl MembershipHandler for WelcomeHandler {
    async fn execute(
        &self,
        _ctx: &HandlerContext<'_>,
        event: &MembershipEvent,
    ) -> Result<Vec<OutboundMessage>, HandlerError> {
        let Some(channel_id) = self.channel_id else {
            return Ok(Vec::new());
        };

        let mut text = format!(
            "Heyyy, {}! Welcome to {}.",
            mention(event.member_id),
            event.community_name
        );
        if let Some(count) = event.member_count {
            text.push_str(&format!(" You are the {} member <3", ordinal(count)));
        }

        Ok(vec![OutboundMessage::text(channel_id, text)])
    }
}

pub struct LeaveHandler {
    channel_id: Option<u64>,
}

impl LeaveHandler {
    pub fn new(channel_id: Option<u64>) -> Self {
        Self { channel_id }
    }
}

#[async_trait]
impl MembershipHandler for LeaveHandler {
    async fn execute(
        &self,
        _ctx: &HandlerContext<'_>,
        event: &MembershipEvent,
    ) -> Result<Vec<OutboundMessage>, HandlerError> {
        let Some(channel_id) = self.channel_id else {
            return Ok(Vec::new());
        };

        Ok(vec![OutboundMessage::text(
            channel_id,
            format!("{} left us! :c", mention(event.member_id)),
        )])
    }
}

use crate::core::commands::command_handler::{CommandHandler, HandlerContext, HandlerError};
use crate::core::commands::command_models::{MessageEvent, OutboundMessage};
use async_trait::async_trait;

/// `ping` - replies "Pong!".
pub struct PingHandler;

#[async_trait]
impl CommandHandler for PingHandler {
    async fn execute(
        &self,
        _ctx: &HandlerContext<'_>,
        event: &MessageEvent,
    ) -> Result<Vec<OutboundMessage>, HandlerError> {
        Ok(vec![OutboundMessage::reply(event.reply_target, "Pong!")])
    }
}

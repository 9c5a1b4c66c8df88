// `level` - the sender's level card.
//
// No record yet means nothing to show, so the command stays silent. A failed
// profile lookup aborts the card; the ledger is only read here.

use super::formatting::{build_progress_bar, level_colour};
use crate::core::commands::command_handler::{CommandHandler, HandlerContext, HandlerError};
use crate::core::commands::command_models::{Card, MessageEvent, OutboundMessage};
use async_trait::async_trait;

pub struct LevelHandler;

#[async_trait]
impl CommandHandler for LevelHandler {
    async fn execute(
        &self,
        ctx: &HandlerContext<'_>,
        event: &MessageEvent,
    ) -> Result<Vec<OutboundMessage>, HandlerError> {
        let Some(community_id) = event.community_id else {
            return Ok(Vec::new());
        };

        let Some(standing) = ctx
            .leveling
            .member_standing(community_id, event.sender_id)
            .await?
        else {
            tracing::debug!(
                member_id = event.sender_id,
                community_id,
                "No XP record for level card"
            );
            return Ok(Vec::new());
        };

        let profile = ctx
            .directory
            .member_profile(community_id, event.sender_id)
            .await?;
        let name = profile
            .as_ref()
            .map(|p| p.display_name.as_str())
            .unwrap_or(event.sender_name.as_str());

        let progress = ctx.leveling.progression().progress_in_level(standing.xp);
        let mut card = Card::new(format!("@{}", name))
            .description(format!("You're Level {}", standing.level))
            .colour(level_colour(standing.level))
            .field(
                "XP",
                format!("{} / {} XP", standing.xp, standing.next_level_xp),
                true,
            )
            .field(
                "Progress",
                build_progress_bar(progress, 18),
                false,
            );
        if let Some(avatar) = profile.and_then(|p| p.avatar_url) {
            card = card.thumbnail(avatar);
        }

        Ok(vec![OutboundMessage::card(
            event.reply_target.channel_id,
            card,
        )])
    }
}

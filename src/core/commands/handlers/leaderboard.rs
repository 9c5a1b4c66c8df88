use super::formatting::COLOUR_GOLD;
use crate::core::commands::command_handler::{CommandHandler, HandlerContext, HandlerError};
use crate::core::commands::command_models::{mention, Card, MessageEvent, OutboundMessage};
use async_trait::async_trait;

pub const LEADERBOARD_SIZE: usize = 10;

/// `leaderboard` - top members of the community by XP.
pub struct LeaderboardHandler;

#[async_trait]
impl CommandHandler for LeaderboardHandler {
    async fn execute(
        &self,
        ctx: &HandlerContext<'_>,
        event: &MessageEvent,
    ) -> Result<Vec<OutboundMessage>, HandlerError> {
        let Some(community_id) = event.community_id else {
            return Ok(Vec::new());
        };
        // No ledger, or one with no records yet
        let Some(entries) = ctx
            .leveling
            .leaderboard(community_id, LEADERBOARD_SIZE)
            .await?
        else {
            return Ok(Vec::new());
        };

        let mut lines = Vec::with_capacity(entries.len());
        for entry in &entries {
            // Members who left the server still hold their ranking
            let name = ctx
                .directory
                .member_profile(community_id, entry.member_id)
                .await?
                .map(|p| p.display_name)
                .unwrap_or_else(|| mention(entry.member_id));
            lines.push(format!(
                "**#{}** {} · Level {} · {} XP",
                entry.rank, name, entry.level, entry.xp
            ));
        }

        let card = Card::new("Leaderboard")
            .description(lines.join("\n"))
            .colour(COLOUR_GOLD);

        Ok(vec![OutboundMessage::card(
            event.reply_target.channel_id,
            card,
        )])
    }
}

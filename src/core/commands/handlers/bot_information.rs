// `bot-information` - a status card: host OS, how many servers the bot is
// in, gateway round-trip time, who runs it, and uptime.

use super::formatting::COLOUR_BLURPLE;
use crate::core::commands::command_handler::{CommandHandler, HandlerContext, HandlerError};
use crate::core::commands::command_models::{Card, MessageEvent, OutboundMessage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Latency probe failed: {0}")]
pub struct ProbeError(pub String);

/// Measures a round trip to the chat platform's API.
#[async_trait]
pub trait LatencyProbe: Send + Sync {
    async fn round_trip(&self) -> Result<Duration, ProbeError>;
}

pub struct BotInformationHandler<P: LatencyProbe> {
    probe: P,
    developer: Option<String>,
    started_at: DateTime<Utc>,
}

impl<P: LatencyProbe> BotInformationHandler<P> {
    pub fn new(probe: P, developer: Option<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            probe,
            developer,
            started_at,
        }
    }
}

fn format_uptime(uptime: chrono::Duration) -> String {
    let minutes = uptime.num_minutes().max(0);
    let (days, hours, minutes) = (minutes / 1440, (minutes % 1440) / 60, minutes % 60);
    match (days, hours) {
        (0, 0) => format!("{}m", minutes),
        (0, _) => format!("{}h {}m", hours, minutes),
        _ => format!("{}d {}h {}m", days, hours, minutes),
    }
}

#[async_trait]
impl<P: LatencyProbe> CommandHandler for BotInformationHandler<P> {
    async fn execute(
        &self,
        ctx: &HandlerContext<'_>,
        event: &MessageEvent,
    ) -> Result<Vec<OutboundMessage>, HandlerError> {
        let ping = match self.probe.round_trip().await {
            Ok(rtt) => format!("{} ms", rtt.as_millis()),
            Err(e) => {
                tracing::warn!("Error fetching ping: {}", e);
                "Error fetching ping".to_string()
            }
        };

        let card = Card::new("Bot Info")
            .colour(COLOUR_BLURPLE)
            .field(
                "OS",
                format!("{} ({})", std::env::consts::OS, std::env::consts::ARCH),
                false,
            )
            .field("Servers", ctx.directory.community_count().to_string(), true)
            .field("Ping", ping, true)
            .field(
                "Developer",
                self.developer.as_deref().unwrap_or("Not Available"),
                true,
            )
            .field("Uptime", format_uptime(Utc::now() - self.started_at), true);

        Ok(vec![OutboundMessage::card(
            event.reply_target.channel_id,
            card,
        )])
    }
}

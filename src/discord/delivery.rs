use crate::core::commands::{
    Card, DeliveryError, Destination, MessageSink, OutboundMessage, Payload,
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Sends core outbound messages through the Discord HTTP API.
pub struct SerenityDelivery {
    http: Arc<serenity::Http>,
}

impl SerenityDelivery {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

pub fn build_embed(card: &Card) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(&card.title)
        .color(card.colour);

    if let Some(description) = &card.description {
        embed = embed.description(description);
    }
    for field in &card.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(url) = &card.thumbnail_url {
        embed = embed.thumbnail(url);
    }
    if let Some(footer) = &card.footer {
        embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
    }
    embed
}

#[async_trait]
impl MessageSink for SerenityDelivery {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let mut builder = match &message.payload {
            Payload::Text(text) => serenity::CreateMessage::new().content(text),
            Payload::Card(card) => serenity::CreateMessage::new().embed(build_embed(card)),
        };

        let channel_id = match message.destination {
            Destination::Reply(target) => {
                builder = builder.reference_message((
                    serenity::ChannelId::new(target.channel_id),
                    serenity::MessageId::new(target.message_id),
                ));
                target.channel_id
            }
            Destination::Channel(channel_id) => channel_id,
        };
        if channel_id == 0 {
            return Err(DeliveryError::Failed("channel ID 0".to_string()));
        }

        serenity::ChannelId::new(channel_id)
            .send_message(self.http.as_ref(), builder)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError::Failed(e.to_string()))
    }
}

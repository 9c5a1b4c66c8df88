// Platform-agnostic event and reply types.
//
// The Discord layer converts gateway events into these and turns outbound
// messages back into Discord API calls. Nothing in here knows about serenity.

/// Where replies for a message should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTarget {
    pub channel_id: u64,
    pub message_id: u64,
}

/// A chat message seen by the bot.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub sender_id: u64,
    pub sender_name: String,
    pub sender_is_automated: bool,
    pub content: String,
    /// `None` for direct messages.
    pub community_id: Option<u64>,
    pub reply_target: ReplyTarget,
}

/// A member joining or leaving a community.
#[derive(Debug, Clone)]
pub struct MembershipEvent {
    pub member_id: u64,
    pub member_name: String,
    pub member_is_automated: bool,
    pub community_id: u64,
    pub community_name: String,
    /// Only known on join.
    pub member_count: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum InboundEvent {
    Message(MessageEvent),
    MemberJoined(MembershipEvent),
    MemberLeft(MembershipEvent),
}

impl InboundEvent {
    pub fn is_from_automated(&self) -> bool {
        match self {
            InboundEvent::Message(message) => message.sender_is_automated,
            InboundEvent::MemberJoined(member) | InboundEvent::MemberLeft(member) => {
                member.member_is_automated
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Reply to the message that triggered the handler.
    Reply(ReplyTarget),
    /// Post into a channel without referencing a message.
    Channel(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Structured display payload. The Discord layer renders it as an embed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<CardField>,
    pub thumbnail_url: Option<String>,
    pub footer: Option<String>,
    pub colour: u32,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(CardField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = colour;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Card(Card),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub destination: Destination,
    pub payload: Payload,
}

impl OutboundMessage {
    pub fn reply(target: ReplyTarget, text: impl Into<String>) -> Self {
        Self {
            destination: Destination::Reply(target),
            payload: Payload::Text(text.into()),
        }
    }

    pub fn text(channel_id: u64, text: impl Into<String>) -> Self {
        Self {
            destination: Destination::Channel(channel_id),
            payload: Payload::Text(text.into()),
        }
    }

    pub fn card(channel_id: u64, card: Card) -> Self {
        Self {
            destination: Destination::Channel(channel_id),
            payload: Payload::Card(card),
        }
    }
}

/// Discord renders `<@id>` as a ping of that user.
pub fn mention(member_id: u64) -> String {
    format!("<@{}>", member_id)
}

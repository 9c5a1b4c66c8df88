// Gateway event -> core event. Only the fields the dispatch engine needs are
// copied; everything else about the serenity types stays in this file.

use crate::core::commands::{InboundEvent, MembershipEvent, MessageEvent, ReplyTarget};
use poise::serenity_prelude as serenity;

pub fn translate(ctx: &serenity::Context, event: &serenity::FullEvent) -> Option<InboundEvent> {
    match event {
        serenity::FullEvent::Message { new_message } => Some(message_event(new_message)),
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            Some(member_joined(ctx, new_member))
        }
        serenity::FullEvent::GuildMemberRemoval { guild_id, user, .. } => {
            Some(member_left(ctx, *guild_id, user))
        }
        _ => None,
    }
}

pub fn message_event(message: &serenity::Message) -> InboundEvent {
    InboundEvent::Message(MessageEvent {
        sender_id: message.author.id.get(),
        sender_name: message.author.name.clone(),
        sender_is_automated: message.author.bot,
        content: message.content.clone(),
        community_id: message.guild_id.map(|id| id.get()),
        reply_target: ReplyTarget {
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
        },
    })
}

/// Guild name and member count from the cache, if the guild is cached.
fn guild_summary(ctx: &serenity::Context, guild_id: serenity::GuildId) -> (String, Option<u64>) {
    match ctx.cache.guild(guild_id) {
        Some(guild) => (guild.name.clone(), Some(guild.member_count)),
        None => ("the server".to_string(), None),
    }
}

pub fn member_joined(ctx: &serenity::Context, member: &serenity::Member) -> InboundEvent {
    let (community_name, member_count) = guild_summary(ctx, member.guild_id);

    InboundEvent::MemberJoined(MembershipEvent {
        member_id: member.user.id.get(),
        member_name: member.user.name.clone(),
        member_is_automated: member.user.bot,
        community_id: member.guild_id.get(),
        community_name,
        member_count,
    })
}

pub fn member_left(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    user: &serenity::User,
) -> InboundEvent {
    let (community_name, _) = guild_summary(ctx, guild_id);

    InboundEvent::MemberLeft(MembershipEvent {
        member_id: user.id.get(),
        member_name: user.name.clone(),
        member_is_automated: user.bot,
        community_id: guild_id.get(),
        community_name,
        member_count: None,
    })
}

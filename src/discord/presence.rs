// This module handles bot presence.
//
// Discord-layer glue only: the activity line advertises the configured
// command prefix so members can discover the commands.

use poise::serenity_prelude as serenity;

pub fn activity_line(prefix: &str) -> String {
    format!("{}ping | {}level", prefix, prefix)
}

/// Resets the bot's status to the default message.
pub fn reset_status(ctx: &serenity::Context, prefix: &str) {
    let activity = serenity::ActivityData::listening(activity_line(prefix));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

/// Called once the bot is ready so we can announce a default presence message
/// without repeating the setup code at every call site.
pub fn on_ready(ctx: &serenity::Context, prefix: &str) {
    reset_status(ctx, prefix);
}

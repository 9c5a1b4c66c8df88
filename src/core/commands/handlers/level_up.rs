use super::formatting::{build_progress_bar, level_colour};
use crate::core::commands::command_models::{mention, Card, OutboundMessage};
use crate::core::leveling::{LevelUpEvent, Progression};
use rand::seq::SliceRandom;

/// The congratulation posted in the channel where the level was earned.
pub fn level_up_notice(
    progression: &Progression,
    level_up: &LevelUpEvent,
    channel_id: u64,
) -> OutboundMessage {
    let floor = progression.level_floor(level_up.new_level);
    let xp_in_level = level_up.total_xp.saturating_sub(floor);

    let card = Card::new("Level Up!")
        .description(format!(
            "Congratulations {}, you are now Level {}.",
            mention(level_up.member_id),
            level_up.new_level
        ))
        .colour(level_colour(level_up.new_level))
        .field("Total XP", level_up.total_xp.to_string(), true)
        .field(
            "Progress",
            format!(
                "{}/{} XP\n{}",
                xp_in_level,
                progression.level_base(),
                build_progress_bar(progression.progress_in_level(level_up.total_xp), 18)
            ),
            false,
        )
        .footer(random_flavor_line());

    OutboundMessage::card(channel_id, card)
}

fn random_flavor_line() -> &'static str {
    const FLAVOR_LINES: [&str; 4] = [
        "Keep the streak going!",
        "Your grind is paying off.",
        "Another level, another flex.",
        "That XP bar never stood a chance.",
    ];

    FLAVOR_LINES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FLAVOR_LINES[0])
}

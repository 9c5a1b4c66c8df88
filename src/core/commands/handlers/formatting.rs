// Small text helpers shared by the display handlers.

pub const COLOUR_BLURPLE: u32 = 0x5865F2;
pub const COLOUR_GOLD: u32 = 0xF1C40F;

pub fn level_colour(level: u64) -> u32 {
    if level >= 50 {
        0x71368A // dark purple
    } else if level >= 25 {
        0xE67E22 // orange
    } else if level >= 10 {
        COLOUR_GOLD
    } else if level >= 5 {
        COLOUR_BLURPLE
    } else {
        0x979C9F // light grey
    }
}

pub fn build_progress_bar(progress: f64, length: usize) -> String {
    let clamped = progress.clamp(0.0, 1.0);
    let mut filled = (clamped * length as f64).round() as usize;
    if clamped > 0.0 && filled == 0 {
        filled = 1;
    }
    filled = filled.min(length);
    let filled_char = "▰";
    let empty_char = "▱";
    let bar = filled_char.repeat(filled) + &empty_char.repeat(length - filled);
    format!("{} ({}%)", bar, (clamped * 100.0).round() as u32)
}

/// 1st, 2nd, 3rd, 4th ... 11th, 12th, 13th ... 21st
pub fn ordinal(n: u64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

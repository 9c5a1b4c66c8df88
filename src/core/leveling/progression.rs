// Pure level math. No state besides the configured level base, no I/O.
// The ledger update path and the display handlers both go through this
// so a level shown on a card is always the level stored in the ledger.

use super::LevelingError;
use std::num::NonZeroU64;

/// Hard cap on XP credited for a single message, whatever its length.
pub const MAX_XP_PER_MESSAGE: u64 = 25;

/// Linear progression: every `level_base` XP is one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    level_base: NonZeroU64,
}

impl Progression {
    pub fn new(level_base: u64) -> Result<Self, LevelingError> {
        NonZeroU64::new(level_base)
            .map(|level_base| Self { level_base })
            .ok_or(LevelingError::InvalidLevelBase)
    }

    pub fn level_base(&self) -> u64 {
        self.level_base.get()
    }

    /// `floor(xp / level_base)`
    pub fn level_for_xp(&self, xp: u64) -> u64 {
        xp / self.level_base.get()
    }

    /// XP at which `level` starts.
    pub fn level_floor(&self, level: u64) -> u64 {
        level.saturating_mul(self.level_base.get())
    }

    /// XP needed to reach the level after `level`.
    pub fn next_level_threshold(&self, level: u64) -> u64 {
        level.saturating_add(1).saturating_mul(self.level_base.get())
    }

    /// Fraction of the current level already earned, in `0.0..=1.0`.
    pub fn progress_in_level(&self, xp: u64) -> f64 {
        let level = self.level_for_xp(xp);
        let into_level = xp.saturating_sub(self.level_floor(level));
        (into_level as f64 / self.level_base.get() as f64).clamp(0.0, 1.0)
    }
}

/// XP credited for a message of `message_len` characters.
pub fn message_xp(message_len: usize, xp_factor: u64) -> u64 {
    (message_len as u64)
        .saturating_mul(xp_factor)
        .min(MAX_XP_PER_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_floor_division() {
        let progression = Progression::new(20).unwrap();

        assert_eq!(progression.level_for_xp(0), 0);
        assert_eq!(progression.level_for_xp(19), 0);
        assert_eq!(progression.level_for_xp(20), 1);
        assert_eq!(progression.level_for_xp(99), 4);
        assert_eq!(progression.level_for_xp(100), 5);
    }

    #[test]
    fn thresholds_follow_level_base() {
        let progression = Progression::new(20).unwrap();

        assert_eq!(progression.next_level_threshold(0), 20);
        assert_eq!(progression.next_level_threshold(4), 100);
        assert_eq!(progression.level_floor(4), 80);
        assert_eq!(progression.progress_in_level(90), 0.5);
    }

    #[test]
    fn zero_level_base_is_rejected() {
        assert!(matches!(
            Progression::new(0),
            Err(LevelingError::InvalidLevelBase)
        ));
    }

    #[test]
    fn message_xp_is_capped() {
        assert_eq!(message_xp(10, 1), 10);
        assert_eq!(message_xp(25, 1), 25);
        assert_eq!(message_xp(50, 1), 25);
        assert_eq!(message_xp(13, 2), 25);
        assert_eq!(message_xp(0, 3), 0);
        assert_eq!(message_xp(usize::MAX, u64::MAX), MAX_XP_PER_MESSAGE);
    }
}

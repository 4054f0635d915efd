//! XP and Level system
//!
//! Experience is tracked per level: reaching `level_threshold(level)` moves the
//! user up one level and the threshold is subtracted, so the stored experience
//! is always the overflow within the current level.

use serde::Serialize;

use crate::domain::UserProgress;

/// Experience needed to advance past `level`: `floor(100 * level^1.5)`.
///
/// Computed as `isqrt(10000 * level^3)` so the floor is exact for every level.
pub fn level_threshold(level: u32) -> u64 {
    let level = u128::from(level.max(1));
    let squared = 10_000 * level * level * level;
    u64::try_from(squared.isqrt()).unwrap_or(u64::MAX)
}

/// Result of applying a reward to a user's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelOutcome {
    pub progress: UserProgress,
    pub leveled_up: bool,
}

/// Add `reward` experience and roll over as many levels as it covers.
///
/// A large reward can cross several thresholds in one call; each level
/// consumes its own threshold.
pub fn apply_xp(current: UserProgress, reward: u64) -> LevelOutcome {
    let mut experience = current.experience.saturating_add(reward);
    let mut level = current.level.max(1);
    let mut leveled_up = false;

    loop {
        let threshold = level_threshold(level);
        if experience < threshold {
            break;
        }
        experience -= threshold;
        level += 1;
        leveled_up = true;
    }

    LevelOutcome {
        progress: UserProgress { experience, level },
        leveled_up,
    }
}

/// XP rewards for reading activity
pub struct XpRewards;

impl XpRewards {
    pub const PER_PAGE: u64 = 2;
    pub const PER_CHAPTER: u64 = 10;

    /// Reward for one reading log
    pub fn for_reading(pages_read: u32, chapters_read: u32) -> u64 {
        u64::from(pages_read) * Self::PER_PAGE + u64::from(chapters_read) * Self::PER_CHAPTER
    }
}

/// Level view of a user's progress
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStats {
    pub level: u32,
    pub experience: u64,
    /// Experience needed to leave the current level
    pub next_level_xp: u64,
}

impl PlayerStats {
    pub fn new(progress: UserProgress) -> Self {
        Self {
            level: progress.level,
            experience: progress.experience,
            next_level_xp: level_threshold(progress.level),
        }
    }

    /// Progress within the current level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f64 {
        if self.next_level_xp == 0 {
            0.0
        } else {
            self.experience as f64 / self.next_level_xp as f64
        }
    }
}

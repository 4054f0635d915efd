//! Gamification system: XP, Levels, Achievements and Streaks
//!
//! Pure rules (`levels`, `checker`, `streaks`) plus the manager that applies
//! them through the storage traits.

mod checker;
mod definitions;
mod levels;
mod manager;
mod streaks;

pub use checker::{check_reading_achievements, is_night_hour, AchievementRule, READING_RULES};
pub use definitions::{
    Achievement, AchievementDefinition, AchievementId, ACHIEVEMENTS,
};
pub use levels::{apply_xp, level_threshold, LevelOutcome, PlayerStats, XpRewards};
pub use manager::{AchievementManager, GamificationEvent, LevelUp, UnlockedAchievement};
pub use streaks::current_streak;

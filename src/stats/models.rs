//! Result types returned by the recorder and query interfaces

use serde::Serialize;

use super::achievements::{Achievement, GamificationEvent, PlayerStats};
use crate::domain::{DailyReadingLog, UserProgress};

/// Everything that happened while logging one day of reading
#[derive(Debug, Clone, Serialize)]
pub struct LogOutcome {
    pub log: DailyReadingLog,
    /// XP for the pages and chapters themselves, excluding achievement rewards
    pub xp_earned: u64,
    /// True if any level was gained, including through achievement rewards
    pub leveled_up: bool,
    pub new_level: u32,
    pub progress: UserProgress,
    pub new_achievements: Vec<Achievement>,
    pub events: Vec<GamificationEvent>,
}

/// Catalog entry with the user's unlock state
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    /// Unlock time (ms since epoch), `None` while locked
    pub earned_at: Option<i64>,
}

/// Reading totals shown on a profile
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadingTotals {
    pub total_pages: u64,
    /// Sum of mirrored chapters across both library tables
    pub total_chapters: u64,
    pub books_finished: u64,
    pub streak: u32,
}

/// Profile summary: level, totals and latest achievements
#[derive(Debug, Clone, Serialize)]
pub struct ReadingSummary {
    pub username: String,
    pub player: PlayerStats,
    pub xp_progress: f64,
    pub totals: ReadingTotals,
    pub recent_achievements: Vec<AchievementStatus>,
}

/// One day of a reading plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDay {
    pub day: u32,
    pub pages_to_read: u32,
    pub description: String,
}

/// Day-by-day pages plan for a challenge
#[derive(Debug, Clone, Serialize)]
pub struct ReadingPlan {
    pub schedule: Vec<PlanDay>,
}

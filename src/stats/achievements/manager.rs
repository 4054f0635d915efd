//! Achievement Manager - Core gamification logic
//!
//! Awards XP, applies level-ups and unlocks achievements through the storage
//! traits. Callers run it inside the user's critical section so the
//! read-modify-write of progress and the unlock check-then-insert cannot
//! interleave with another request for the same user.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::checker::check_reading_achievements;
use super::definitions::{Achievement, AchievementId};
use super::levels::{apply_xp, LevelOutcome};
use crate::domain::{ReadingActivityEvent, UserId, UserProgress};
use crate::error::Result;
use crate::stats::store::{AchievementCatalog, ProgressStore, UnlockStore};

/// An achievement that was just unlocked
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    pub achievement: Achievement,
    pub unlocked_at: i64,
}

/// A level up event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
}

/// Events that can happen during gamification checks
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GamificationEvent {
    XpAwarded { amount: u64, reason: String },
    LevelUp(LevelUp),
    AchievementUnlocked(UnlockedAchievement),
}

/// Gamification logic over any store implementing the storage traits
pub struct AchievementManager<'s, S> {
    store: &'s S,
    now_ms: i64,
}

impl<'s, S> AchievementManager<'s, S>
where
    S: ProgressStore + UnlockStore + AchievementCatalog,
{
    pub fn new(store: &'s S, now_ms: i64) -> Self {
        Self { store, now_ms }
    }

    /// Award XP and roll over levels; returns the level-up, if any
    pub fn award_xp(&self, user: UserId, amount: u64) -> Result<(UserProgress, Option<LevelUp>)> {
        let current = self.store.load_progress(user)?;
        let LevelOutcome {
            progress,
            leveled_up,
        } = apply_xp(current, amount);
        self.store.save_progress(user, progress)?;

        let level_up = leveled_up.then_some(LevelUp {
            old_level: current.level,
            new_level: progress.level,
        });
        if let Some(up) = level_up {
            info!(user, old_level = up.old_level, new_level = up.new_level, "level up");
        }
        Ok((progress, level_up))
    }

    /// Unlock an achievement once and pay out its reward.
    ///
    /// Returns `None` when the code is missing from the catalog or the unlock
    /// row already exists.
    pub fn award_achievement(
        &self,
        user: UserId,
        id: AchievementId,
        events: &mut Vec<GamificationEvent>,
    ) -> Result<Option<UnlockedAchievement>> {
        let Some(achievement) = self.store.lookup_achievement(id.as_str())? else {
            warn!(code = id.as_str(), "achievement not in catalog, skipping");
            return Ok(None);
        };

        if !self
            .store
            .insert_unlock_if_absent(user, &achievement.code, self.now_ms)?
        {
            debug!(user, code = %achievement.code, "achievement already unlocked");
            return Ok(None);
        }

        info!(user, code = %achievement.code, reward = achievement.experience_reward, "achievement unlocked");
        let reward = u64::from(achievement.experience_reward);
        let (_, level_up) = self.award_xp(user, reward)?;
        if let Some(up) = level_up {
            events.push(GamificationEvent::LevelUp(up));
        }

        Ok(Some(UnlockedAchievement {
            achievement,
            unlocked_at: self.now_ms,
        }))
    }

    /// Evaluate the reading rules for an event and award what they unlock
    pub fn check_after_reading(
        &self,
        user: UserId,
        event: &ReadingActivityEvent,
        hour: u32,
    ) -> Result<Vec<GamificationEvent>> {
        let unlocked: HashSet<String> = self.store.unlocked_codes(user)?;
        let mut events = Vec::new();

        for id in check_reading_achievements(&unlocked, event, hour) {
            let mut level_events = Vec::new();
            if let Some(unlocked) = self.award_achievement(user, id, &mut level_events)? {
                events.push(GamificationEvent::AchievementUnlocked(unlocked));
                events.extend(level_events);
            }
        }

        Ok(events)
    }
}

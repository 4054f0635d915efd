//! Achievement checking logic
//!
//! Rules live in an ordered registry. A rule without a predicate is known to
//! the catalog but never fires from reading activity.

use std::collections::HashSet;

use super::definitions::AchievementId;
use crate::domain::ReadingActivityEvent;

type Predicate = fn(&ReadingActivityEvent, u32) -> bool;

/// One entry of the rule registry
pub struct AchievementRule {
    pub id: AchievementId,
    pub predicate: Option<Predicate>,
}

impl AchievementRule {
    pub fn is_implemented(&self) -> bool {
        self.predicate.is_some()
    }
}

/// Registry order is the order newly unlocked achievements are reported in
pub static READING_RULES: &[AchievementRule] = &[
    AchievementRule {
        id: AchievementId::FirstBook,
        predicate: Some(finished_challenge),
    },
    AchievementRule {
        id: AchievementId::NightOwl,
        predicate: Some(late_night),
    },
    // No streak predicate yet: waiting on a product decision for how a day counts
    AchievementRule {
        id: AchievementId::Streak7,
        predicate: None,
    },
    // Awarded by following, not by reading
    AchievementRule {
        id: AchievementId::SocialButterfly,
        predicate: None,
    },
];

fn finished_challenge(event: &ReadingActivityEvent, _hour: u32) -> bool {
    event.challenge_completed
}

fn late_night(_event: &ReadingActivityEvent, hour: u32) -> bool {
    is_night_hour(hour)
}

/// 23:00 through 04:59 on the local clock
pub fn is_night_hour(hour: u32) -> bool {
    hour >= 23 || hour <= 4
}

/// Check which reading achievements an event newly unlocks
pub fn check_reading_achievements(
    unlocked: &HashSet<String>,
    event: &ReadingActivityEvent,
    hour: u32,
) -> Vec<AchievementId> {
    READING_RULES
        .iter()
        .filter(|rule| !unlocked.contains(rule.id.as_str()))
        .filter(|rule| rule.predicate.is_some_and(|p| p(event, hour)))
        .map(|rule| rule.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(completed: bool) -> ReadingActivityEvent {
        ReadingActivityEvent {
            challenge_id: 1,
            pages_read: 10,
            chapters_read: 1,
            end_page: 10,
            end_chapter: 1,
            challenge_completed: completed,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_first_book_requires_completion() {
        let none = HashSet::new();
        assert!(check_reading_achievements(&none, &event(false), 12).is_empty());
        assert_eq!(
            check_reading_achievements(&none, &event(true), 12),
            vec![AchievementId::FirstBook]
        );
    }

    #[test]
    fn test_night_owl_boundaries() {
        let none = HashSet::new();
        for hour in [23, 0, 2, 4] {
            assert_eq!(
                check_reading_achievements(&none, &event(false), hour),
                vec![AchievementId::NightOwl],
                "hour {}",
                hour
            );
        }
        for hour in [5, 12, 22] {
            assert!(
                check_reading_achievements(&none, &event(false), hour).is_empty(),
                "hour {}",
                hour
            );
        }
    }

    #[test]
    fn test_registry_order() {
        let none = HashSet::new();
        assert_eq!(
            check_reading_achievements(&none, &event(true), 23),
            vec![AchievementId::FirstBook, AchievementId::NightOwl]
        );
    }

    #[test]
    fn test_already_unlocked_is_skipped() {
        let mut unlocked = HashSet::new();
        let first = check_reading_achievements(&unlocked, &event(true), 1);
        for id in &first {
            unlocked.insert(id.as_str().to_string());
        }
        assert!(check_reading_achievements(&unlocked, &event(true), 1).is_empty());
    }

    #[test]
    fn test_streak_rule_never_fires() {
        let rule = READING_RULES
            .iter()
            .find(|r| r.id == AchievementId::Streak7)
            .unwrap();
        assert!(!rule.is_implemented());

        let none = HashSet::new();
        for hour in 0..24 {
            let ids = check_reading_achievements(&none, &event(true), hour);
            assert!(!ids.contains(&AchievementId::Streak7));
        }
    }
}

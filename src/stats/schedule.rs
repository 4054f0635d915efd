//! Offline reading plans
//!
//! Splits the pages left in a challenge into a day-by-day plan. Plans never
//! list more than `MAX_PLAN_DAYS` days.

use chrono::NaiveDate;

use super::models::{PlanDay, ReadingPlan};
use crate::domain::{ChallengeType, ReadingChallenge};

pub const MAX_PLAN_DAYS: u32 = 30;

/// Build the plan for `challenge` as of `today`.
///
/// Dated challenges spread the remaining pages evenly over the days left;
/// everything else repeats the daily page goal (or `default_daily_pages`)
/// until the book would be done.
pub fn plan_for(challenge: &ReadingChallenge, today: NaiveDate, default_daily_pages: u32) -> ReadingPlan {
    let remaining = challenge.total_pages.saturating_sub(challenge.current_page);

    match (challenge.challenge_type, challenge.end_date) {
        (ChallengeType::FinishByDate, Some(end_date)) => {
            let days_left = (end_date - today).num_days().max(1);
            let days_left = u32::try_from(days_left).unwrap_or(u32::MAX);
            let per_day = remaining / days_left;
            repeat_plan(days_left, per_day, "Steady reading")
        }
        _ => {
            let daily = match challenge.daily_goal_pages {
                0 => default_daily_pages.max(1),
                goal => goal,
            };
            let days = remaining / daily + 1;
            repeat_plan(days, daily, "Daily goal")
        }
    }
}

fn repeat_plan(days: u32, pages: u32, description: &str) -> ReadingPlan {
    let schedule = (1..=days.min(MAX_PLAN_DAYS))
        .map(|day| PlanDay {
            day,
            pages_to_read: pages,
            description: description.to_string(),
        })
        .collect();
    ReadingPlan { schedule }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookRef;
    use chrono::Utc;

    fn challenge(kind: ChallengeType, total_pages: u32, current_page: u32) -> ReadingChallenge {
        ReadingChallenge {
            id: 1,
            user_id: 1,
            book_title: "Dune".to_string(),
            book_author: "Frank Herbert".to_string(),
            book: BookRef::Internal(1),
            challenge_type: kind,
            total_pages,
            total_chapters: 0,
            start_date: day(1),
            end_date: None,
            daily_goal_pages: 0,
            daily_goal_chapters: 0,
            current_page,
            current_chapter: 0,
            is_completed: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    #[test]
    fn test_daily_goal_plan() {
        let mut c = challenge(ChallengeType::PagesPerDay, 100, 20);
        c.daily_goal_pages = 25;
        let plan = plan_for(&c, day(1), 20);
        // 80 pages left at 25 a day: 80 / 25 + 1
        assert_eq!(plan.schedule.len(), 4);
        assert!(plan.schedule.iter().all(|d| d.pages_to_read == 25));
        assert_eq!(plan.schedule[0].day, 1);
    }

    #[test]
    fn test_default_daily_pages_used_without_goal() {
        let c = challenge(ChallengeType::Custom, 50, 0);
        let plan = plan_for(&c, day(1), 20);
        assert_eq!(plan.schedule.len(), 3);
        assert_eq!(plan.schedule[0].pages_to_read, 20);
    }

    #[test]
    fn test_plan_capped_at_thirty_days() {
        let c = challenge(ChallengeType::PagesPerDay, 5000, 0);
        assert_eq!(plan_for(&c, day(1), 20).schedule.len(), 30);
    }

    #[test]
    fn test_finish_by_date_spreads_pages() {
        let mut c = challenge(ChallengeType::FinishByDate, 300, 100);
        c.end_date = Some(day(11));
        let plan = plan_for(&c, day(1), 20);
        assert_eq!(plan.schedule.len(), 10);
        assert!(plan.schedule.iter().all(|d| d.pages_to_read == 20));
    }

    #[test]
    fn test_past_deadline_is_one_day() {
        let mut c = challenge(ChallengeType::FinishByDate, 300, 100);
        c.end_date = Some(day(1));
        let plan = plan_for(&c, day(5), 20);
        assert_eq!(plan.schedule, vec![PlanDay {
            day: 1,
            pages_to_read: 200,
            description: "Steady reading".to_string(),
        }]);
    }

    #[test]
    fn test_finish_by_date_without_end_date_uses_daily_plan() {
        let c = challenge(ChallengeType::FinishByDate, 40, 0);
        let plan = plan_for(&c, day(1), 20);
        assert_eq!(plan.schedule.len(), 3);
    }
}

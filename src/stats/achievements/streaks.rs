//! Reading streak calculation
//!
//! A streak counts consecutive days with at least one reading log. It is
//! still alive when today has no log yet but yesterday does.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

/// Length of the streak ending today (or yesterday, if nothing was logged today)
pub fn current_streak(log_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut day = if log_days.contains(&today) {
        today
    } else {
        match today.checked_sub_days(Days::new(1)) {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    while log_days.contains(&day) {
        streak += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

//! Local clock helpers
//!
//! Reading days and the night-owl hour are judged on the reader's wall clock,
//! expressed as a fixed offset from UTC.
//! - Day strings: "YYYY-MM-DD" as stored in `daily_reading_logs.date`

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};

use crate::error::{Result, ShelfError};

/// Fixed offset for `minutes` east of UTC; out-of-range values fall back to UTC
pub fn clock_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

/// Hour of day (0-23) on the local clock
pub fn local_hour(at: DateTime<Utc>, offset: FixedOffset) -> u32 {
    at.with_timezone(&offset).hour()
}

/// Calendar day on the local clock
pub fn local_day(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// Format a day for storage
pub fn day_string(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Parse a stored day string
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| ShelfError::Corrupt(format!("bad date '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_hour_with_offset() {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 21, 30, 0).unwrap();
        assert_eq!(local_hour(at, clock_offset(0)), 21);
        assert_eq!(local_hour(at, clock_offset(120)), 23);
        assert_eq!(local_hour(at, clock_offset(-300)), 16);
    }

    #[test]
    fn test_local_day_crosses_midnight() {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        assert_eq!(day_string(local_day(at, clock_offset(60))), "2026-03-11");
        assert_eq!(day_string(local_day(at, clock_offset(0))), "2026-03-10");
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        assert_eq!(clock_offset(100_000).local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_day() {
        let day = parse_day("2026-01-31").unwrap();
        assert_eq!(day_string(day), "2026-01-31");
        assert!(parse_day("31/01/2026").is_err());
    }
}

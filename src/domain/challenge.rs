use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{BookRef, UserId};

pub type ChallengeId = i64;

/// Kind of goal a reading challenge tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
    /// Finish the book before `end_date`
    FinishByDate,
    PagesPerDay,
    ChaptersPerDay,
    Custom,
}

impl ChallengeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinishByDate => "finish_by_date",
            Self::PagesPerDay => "pages_per_day",
            Self::ChaptersPerDay => "chapters_per_day",
            Self::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "finish_by_date" => Some(Self::FinishByDate),
            "pages_per_day" => Some(Self::PagesPerDay),
            "chapters_per_day" => Some(Self::ChaptersPerDay),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's commitment to read one book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingChallenge {
    pub id: ChallengeId,
    pub user_id: UserId,
    pub book_title: String,
    pub book_author: String,
    /// Library entry this challenge keeps in sync
    pub book: BookRef,
    pub challenge_type: ChallengeType,
    pub total_pages: u32,
    pub total_chapters: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub daily_goal_pages: u32,
    pub daily_goal_chapters: u32,
    pub current_page: u32,
    pub current_chapter: u32,
    pub is_completed: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChallenge {
    pub book_title: String,
    pub book_author: String,
    pub book: BookRef,
    pub challenge_type: ChallengeType,
    pub total_pages: u32,
    pub total_chapters: u32,
    pub end_date: Option<NaiveDate>,
    pub daily_goal_pages: u32,
    pub daily_goal_chapters: u32,
}

/// One day's reading as submitted by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadingLogEntry {
    pub pages_read: u32,
    pub chapters_read: u32,
    pub end_page: u32,
    pub end_chapter: u32,
    pub notes: String,
    /// Defaults to today (local clock) when absent
    pub date: Option<NaiveDate>,
}

/// Stored daily log row; one per `(challenge, date)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReadingLog {
    pub challenge_id: ChallengeId,
    pub date: NaiveDate,
    pub pages_read: u32,
    pub chapters_read: u32,
    pub end_page: u32,
    pub end_chapter: u32,
    pub notes: String,
}

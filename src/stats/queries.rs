//! Read-side queries for profiles, libraries, challenges and plans

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

use super::achievements::{current_streak, Achievement, PlayerStats};
use super::db::ShelfDb;
use super::models::{AchievementStatus, ReadingPlan, ReadingSummary, ReadingTotals};
use super::schedule::plan_for;
use super::time_bucket::{local_day, parse_day};
use crate::domain::{
    BookRef, ChallengeId, ChallengeType, LibraryEntry, ProgressMirror, ReadingChallenge,
    ReadingStatus, User, UserId, UserProgress,
};
use crate::error::{Result, ShelfError};

/// Query interface over the shelf database
#[derive(Clone)]
pub struct ShelfQuery {
    db: ShelfDb,
    offset: FixedOffset,
}

impl ShelfQuery {
    pub fn new(db: ShelfDb, offset: FixedOffset) -> Self {
        Self { db, offset }
    }

    pub fn user(&self, id: UserId) -> Result<User> {
        let conn = self.db.conn();
        conn.query_row(
            "SELECT id, username, experience, level, created_at FROM users WHERE id = ?1",
            [id],
            user_from_row,
        )
        .optional()?
        .ok_or_else(|| ShelfError::not_found("user", id))
    }

    pub fn user_by_name(&self, username: &str) -> Result<User> {
        let conn = self.db.conn();
        conn.query_row(
            "SELECT id, username, experience, level, created_at FROM users WHERE username = ?1",
            [username],
            user_from_row,
        )
        .optional()?
        .ok_or_else(|| ShelfError::not_found("user", username))
    }

    pub fn challenge(&self, user: UserId, id: ChallengeId) -> Result<ReadingChallenge> {
        let conn = self.db.conn();
        load_challenge(&conn, user, id)
    }

    /// All challenges of a user, newest first
    pub fn challenges(&self, user: UserId) -> Result<Vec<ReadingChallenge>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CHALLENGE_COLUMNS} FROM reading_challenges
             WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
            .query_map([user], challenge_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ChallengeRow::into_challenge).collect()
    }

    /// Library entries from both catalogs, internal books first
    pub fn library(&self, user: UserId) -> Result<Vec<LibraryEntry>> {
        let conn = self.db.conn();
        let mut entries = Vec::new();

        let mut stmt = conn.prepare(
            "SELECT b.id, b.title, b.author, ub.status, ub.current_chapter, ub.total_chapters
             FROM user_books ub JOIN books b ON b.id = ub.book_id
             WHERE ub.user_id = ?1 ORDER BY ub.added_at, ub.id",
        )?;
        let internal = stmt
            .query_map([user], |r| {
                Ok((
                    BookRef::Internal(r.get(0)?),
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, u32>(4)?,
                    r.get::<_, u32>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
            "SELECT ol_key, title, author, status, current_chapter, total_chapters
             FROM user_books_external WHERE user_id = ?1 ORDER BY added_at, id",
        )?;
        let external = stmt
            .query_map([user], |r| {
                Ok((
                    BookRef::External(r.get(0)?),
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, u32>(4)?,
                    r.get::<_, u32>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for (book, title, author, status, current_chapter, total_chapters) in
            internal.into_iter().chain(external)
        {
            entries.push(LibraryEntry {
                title,
                author,
                progress: ProgressMirror {
                    book,
                    status: parse_status(&status)?,
                    current_chapter,
                    total_chapters,
                },
            });
        }
        Ok(entries)
    }

    /// Whole catalog with unlock state; unlocked first, most recent first
    pub fn achievements(&self, user: UserId) -> Result<Vec<AchievementStatus>> {
        let conn = self.db.conn();
        all_achievements(&conn, user)
    }

    /// Level, reading totals and the latest `recent` unlocked achievements
    pub fn summary(&self, user: UserId, now: DateTime<Utc>, recent: usize) -> Result<ReadingSummary> {
        let profile = self.user(user)?;
        let today = local_day(now, self.offset);

        let conn = self.db.conn();
        let total_pages: u64 = conn.query_row(
            "SELECT COALESCE(SUM(l.pages_read), 0) FROM daily_reading_logs l
             JOIN reading_challenges c ON c.id = l.challenge_id WHERE c.user_id = ?1",
            [user],
            |r| r.get(0),
        )?;
        let chapters_internal: u64 = conn.query_row(
            "SELECT COALESCE(SUM(current_chapter), 0) FROM user_books WHERE user_id = ?1",
            [user],
            |r| r.get(0),
        )?;
        let chapters_external: u64 = conn.query_row(
            "SELECT COALESCE(SUM(current_chapter), 0) FROM user_books_external WHERE user_id = ?1",
            [user],
            |r| r.get(0),
        )?;
        let books_finished: u64 = conn.query_row(
            "SELECT COUNT(*) FROM user_books WHERE user_id = ?1 AND status = 'read'",
            [user],
            |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(
            "SELECT DISTINCT l.date FROM daily_reading_logs l
             JOIN reading_challenges c ON c.id = l.challenge_id WHERE c.user_id = ?1",
        )?;
        let log_days = stmt
            .query_map([user], |r| r.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .iter()
            .map(|s| parse_day(s))
            .collect::<Result<BTreeSet<NaiveDate>>>()?;

        let recent_achievements = recent_achievements(&conn, user, recent)?;

        let player = PlayerStats::new(profile.progress);
        Ok(ReadingSummary {
            username: profile.username,
            xp_progress: player.progress_to_next(),
            player,
            totals: ReadingTotals {
                total_pages,
                total_chapters: chapters_internal + chapters_external,
                books_finished,
                streak: current_streak(&log_days, today),
            },
            recent_achievements,
        })
    }

    /// Day-by-day plan for the pages left in a challenge
    pub fn plan(
        &self,
        user: UserId,
        challenge: ChallengeId,
        now: DateTime<Utc>,
        default_daily_pages: u32,
    ) -> Result<ReadingPlan> {
        let challenge = self.challenge(user, challenge)?;
        Ok(plan_for(&challenge, local_day(now, self.offset), default_daily_pages))
    }
}

const STATUS_COLUMNS: &str = "a.code, a.name, a.description, a.icon_name, a.xp_reward, ua.earned_at";

/// Whole catalog with the user's lock state
fn all_achievements(conn: &Connection, user: UserId) -> Result<Vec<AchievementStatus>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STATUS_COLUMNS} FROM achievements a
         LEFT JOIN user_achievements ua ON ua.code = a.code AND ua.user_id = ?1
         ORDER BY ua.earned_at IS NULL, ua.earned_at DESC, a.code"
    ))?;
    let statuses = stmt
        .query_map([user], status_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(statuses)
}

/// Latest `limit` unlocked achievements
fn recent_achievements(conn: &Connection, user: UserId, limit: usize) -> Result<Vec<AchievementStatus>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STATUS_COLUMNS} FROM user_achievements ua
         JOIN achievements a ON a.code = ua.code
         WHERE ua.user_id = ?1 ORDER BY ua.earned_at DESC, ua.id DESC LIMIT ?2"
    ))?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let statuses = stmt
        .query_map(rusqlite::params![user, limit], status_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(statuses)
}

fn status_from_row(r: &Row<'_>) -> rusqlite::Result<AchievementStatus> {
    Ok(AchievementStatus {
        achievement: Achievement {
            code: r.get(0)?,
            name: r.get(1)?,
            description: r.get(2)?,
            icon_name: r.get(3)?,
            experience_reward: r.get(4)?,
        },
        earned_at: r.get(5)?,
    })
}

pub(super) const CHALLENGE_COLUMNS: &str = "id, user_id, book_title, book_author, book_kind, book_key, \
     challenge_type, total_pages, total_chapters, start_date, end_date, daily_goal_pages, \
     daily_goal_chapters, current_page, current_chapter, is_completed, is_active, created_at";

/// Raw challenge row before text columns are parsed
pub(super) struct ChallengeRow {
    id: ChallengeId,
    user_id: UserId,
    book_title: String,
    book_author: String,
    book_kind: String,
    book_key: String,
    challenge_type: String,
    total_pages: u32,
    total_chapters: u32,
    start_date: String,
    end_date: Option<String>,
    daily_goal_pages: u32,
    daily_goal_chapters: u32,
    current_page: u32,
    current_chapter: u32,
    is_completed: bool,
    is_active: bool,
    created_at: i64,
}

pub(super) fn challenge_row(r: &Row<'_>) -> rusqlite::Result<ChallengeRow> {
    Ok(ChallengeRow {
        id: r.get(0)?,
        user_id: r.get(1)?,
        book_title: r.get(2)?,
        book_author: r.get(3)?,
        book_kind: r.get(4)?,
        book_key: r.get(5)?,
        challenge_type: r.get(6)?,
        total_pages: r.get(7)?,
        total_chapters: r.get(8)?,
        start_date: r.get(9)?,
        end_date: r.get(10)?,
        daily_goal_pages: r.get(11)?,
        daily_goal_chapters: r.get(12)?,
        current_page: r.get(13)?,
        current_chapter: r.get(14)?,
        is_completed: r.get(15)?,
        is_active: r.get(16)?,
        created_at: r.get(17)?,
    })
}

impl ChallengeRow {
    pub(super) fn into_challenge(self) -> Result<ReadingChallenge> {
        let book = BookRef::from_parts(&self.book_kind, &self.book_key).ok_or_else(|| {
            ShelfError::Corrupt(format!(
                "challenge {} has bad book reference {}:{}",
                self.id, self.book_kind, self.book_key
            ))
        })?;
        let challenge_type = ChallengeType::from_str(&self.challenge_type).ok_or_else(|| {
            ShelfError::Corrupt(format!("unknown challenge type '{}'", self.challenge_type))
        })?;

        Ok(ReadingChallenge {
            id: self.id,
            user_id: self.user_id,
            book_title: self.book_title,
            book_author: self.book_author,
            book,
            challenge_type,
            total_pages: self.total_pages,
            total_chapters: self.total_chapters,
            start_date: parse_day(&self.start_date)?,
            end_date: self.end_date.as_deref().map(parse_day).transpose()?,
            daily_goal_pages: self.daily_goal_pages,
            daily_goal_chapters: self.daily_goal_chapters,
            current_page: self.current_page,
            current_chapter: self.current_chapter,
            is_completed: self.is_completed,
            is_active: self.is_active,
            created_at: DateTime::from_timestamp_millis(self.created_at).unwrap_or_default(),
        })
    }
}

/// Load a challenge owned by `user`
pub(super) fn load_challenge(
    conn: &Connection,
    user: UserId,
    id: ChallengeId,
) -> Result<ReadingChallenge> {
    conn.query_row(
        &format!("SELECT {CHALLENGE_COLUMNS} FROM reading_challenges WHERE id = ?1 AND user_id = ?2"),
        rusqlite::params![id, user],
        challenge_row,
    )
    .optional()?
    .ok_or_else(|| ShelfError::not_found("challenge", id))?
    .into_challenge()
}

pub(super) fn user_from_row(r: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: r.get(0)?,
        username: r.get(1)?,
        progress: UserProgress {
            experience: r.get(2)?,
            level: r.get(3)?,
        },
        created_at: DateTime::from_timestamp_millis(r.get(4)?).unwrap_or_default(),
    })
}

fn parse_status(s: &str) -> Result<ReadingStatus> {
    ReadingStatus::from_str(s)
        .ok_or_else(|| ShelfError::Corrupt(format!("unknown reading status '{}'", s)))
}

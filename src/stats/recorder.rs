//! Shelf recorder - writes users, library entries, challenges and reading logs
//!
//! Every write that touches a user's experience, unlocks or progress mirrors
//! runs under that user's lock and inside one immediate transaction.

use chrono::{DateTime, FixedOffset, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, info};

use super::achievements::{AchievementManager, GamificationEvent, XpRewards, ACHIEVEMENTS};
use super::db::ShelfDb;
use super::locks::UserLocks;
use super::models::LogOutcome;
use super::queries::{load_challenge, user_from_row};
use super::store::{MirrorStore, ProgressStore, StoreTx};
use super::sync::{finish_progress, sync_progress};
use super::time_bucket::{day_string, local_day, local_hour};
use crate::domain::{
    Book, BookRef, ChallengeId, DailyReadingLog, NewChallenge, ProgressMirror,
    ReadingActivityEvent, ReadingChallenge, ReadingLogEntry, ReadingStatus, User, UserId,
};
use crate::error::{Result, ShelfError};

/// Records reading activity to the database
#[derive(Clone)]
pub struct ShelfRecorder {
    db: ShelfDb,
    locks: UserLocks,
    offset: FixedOffset,
}

impl ShelfRecorder {
    pub fn new(db: ShelfDb, locks: UserLocks, offset: FixedOffset) -> Self {
        Self { db, locks, offset }
    }

    /// Upsert the built-in achievement definitions into the catalog
    pub fn seed_catalog(&self) -> Result<usize> {
        let conn = self.db.conn();
        for def in ACHIEVEMENTS {
            conn.execute(
                r#"INSERT INTO achievements (code, name, description, icon_name, xp_reward)
                   VALUES (?1, ?2, ?3, ?4, ?5)
                   ON CONFLICT(code) DO UPDATE SET
                       name = ?2, description = ?3, icon_name = ?4, xp_reward = ?5"#,
                rusqlite::params![
                    def.id.as_str(),
                    def.name,
                    def.description,
                    def.icon_name,
                    def.xp_reward
                ],
            )?;
        }
        info!(count = ACHIEVEMENTS.len(), "achievement catalog seeded");
        Ok(ACHIEVEMENTS.len())
    }

    pub fn create_user(&self, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ShelfError::InvalidInput("username must not be empty".to_string()));
        }

        let conn = self.db.conn();
        let now = Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO users (username, experience, level, created_at) VALUES (?1, 0, 1, ?2)",
            rusqlite::params![username, now],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                ShelfError::InvalidInput(format!("username '{}' is taken", username))
            }
            other => other.into(),
        })?;

        let id = conn.last_insert_rowid();
        debug!(id, username, "user created");
        Ok(conn.query_row(
            "SELECT id, username, experience, level, created_at FROM users WHERE id = ?1",
            [id],
            user_from_row,
        )?)
    }

    /// Add a book to the local catalog
    pub fn add_book(&self, title: &str, author: &str, page_count: Option<u32>) -> Result<Book> {
        if title.trim().is_empty() {
            return Err(ShelfError::InvalidInput("book title must not be empty".to_string()));
        }
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO books (title, author, page_count) VALUES (?1, ?2, ?3)",
            rusqlite::params![title.trim(), author.trim(), page_count],
        )?;
        Ok(Book {
            id: conn.last_insert_rowid(),
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            page_count,
        })
    }

    /// Put a local catalog book on the user's shelf
    pub fn shelve_internal(
        &self,
        user: UserId,
        book_id: i64,
        status: ReadingStatus,
        total_chapters: u32,
    ) -> Result<BookRef> {
        let conn = self.db.conn();
        ensure_user(&conn, user)?;
        let exists: Option<i64> = conn
            .query_row("SELECT id FROM books WHERE id = ?1", [book_id], |r| r.get(0))
            .optional()?;
        if exists.is_none() {
            return Err(ShelfError::not_found("book", book_id));
        }

        let now = Utc::now().timestamp_millis();
        conn.execute(
            r#"INSERT INTO user_books (user_id, book_id, status, total_chapters, added_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?5)
               ON CONFLICT(user_id, book_id) DO UPDATE SET
                   status = ?3, total_chapters = ?4, updated_at = ?5"#,
            rusqlite::params![user, book_id, status.as_str(), total_chapters, now],
        )?;
        Ok(BookRef::Internal(book_id))
    }

    /// Put an external catalog book on the user's shelf
    pub fn shelve_external(
        &self,
        user: UserId,
        key: &str,
        title: &str,
        author: &str,
        status: ReadingStatus,
        total_chapters: u32,
    ) -> Result<BookRef> {
        let key = key.trim();
        if key.is_empty() {
            return Err(empty_key());
        }
        let conn = self.db.conn();
        ensure_user(&conn, user)?;

        let now = Utc::now().timestamp_millis();
        conn.execute(
            r#"INSERT INTO user_books_external
                   (user_id, ol_key, title, author, status, total_chapters, added_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
               ON CONFLICT(user_id, ol_key) DO UPDATE SET
                   title = ?3, author = ?4, status = ?5, total_chapters = ?6, updated_at = ?7"#,
            rusqlite::params![user, key, title, author, status.as_str(), total_chapters, now],
        )?;
        Ok(BookRef::External(key.to_string()))
    }

    /// Move a library entry to another shelf; progress is left untouched
    pub fn set_status(&self, user: UserId, book: &BookRef, status: ReadingStatus) -> Result<()> {
        let book = normalize_book(book)?;
        self.in_user_tx(user, Utc::now(), |store, _| {
            let Some(mirror) = store.load_mirror(user, &book)? else {
                return Err(ShelfError::not_found("library entry", &book));
            };
            store.save_mirror(user, &ProgressMirror { status, ..mirror })
        })
    }

    pub fn create_challenge(&self, user: UserId, new: &NewChallenge) -> Result<ReadingChallenge> {
        if new.book_title.trim().is_empty() {
            return Err(ShelfError::InvalidInput("book title must not be empty".to_string()));
        }
        let now = Utc::now();
        let start_date = local_day(now, self.offset);
        if let Some(end) = new.end_date {
            if end < start_date {
                return Err(ShelfError::InvalidInput(format!(
                    "end date {} is before start date {}",
                    end, start_date
                )));
            }
        }

        let book = normalize_book(&new.book)?;

        let conn = self.db.conn();
        ensure_user(&conn, user)?;
        conn.execute(
            r#"INSERT INTO reading_challenges
                   (user_id, book_title, book_author, book_kind, book_key, challenge_type,
                    total_pages, total_chapters, start_date, end_date,
                    daily_goal_pages, daily_goal_chapters, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"#,
            rusqlite::params![
                user,
                new.book_title.trim(),
                new.book_author.trim(),
                book.kind(),
                book.key(),
                new.challenge_type.as_str(),
                new.total_pages,
                new.total_chapters,
                day_string(start_date),
                new.end_date.map(day_string),
                new.daily_goal_pages,
                new.daily_goal_chapters,
                now.timestamp_millis(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(user, challenge = id, %book, "challenge created");
        load_challenge(&conn, user, id)
    }

    /// Log one day of reading against a challenge.
    ///
    /// Upserts the day's log, raises the challenge counters, awards reading
    /// XP, syncs the library mirror and unlocks achievements, all in one
    /// transaction.
    pub fn log_reading(
        &self,
        user: UserId,
        challenge_id: ChallengeId,
        entry: &ReadingLogEntry,
        at: DateTime<Utc>,
    ) -> Result<LogOutcome> {
        let offset = self.offset;
        self.in_user_tx(user, at, |store, conn| {
            let mut challenge = load_challenge(conn, user, challenge_id)?;
            if !challenge.is_active {
                return Err(ShelfError::InvalidInput(format!(
                    "challenge {} is paused",
                    challenge.id
                )));
            }
            let date = entry.date.unwrap_or_else(|| local_day(at, offset));

            conn.execute(
                r#"INSERT INTO daily_reading_logs
                       (challenge_id, date, pages_read, chapters_read, end_page, end_chapter, notes)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                   ON CONFLICT(challenge_id, date) DO UPDATE SET
                       pages_read = ?3, chapters_read = ?4, end_page = ?5, end_chapter = ?6, notes = ?7"#,
                rusqlite::params![
                    challenge.id,
                    day_string(date),
                    entry.pages_read,
                    entry.chapters_read,
                    entry.end_page,
                    entry.end_chapter,
                    entry.notes,
                ],
            )?;

            challenge.current_page = challenge.current_page.max(entry.end_page);
            challenge.current_chapter = challenge.current_chapter.max(entry.end_chapter);
            conn.execute(
                "UPDATE reading_challenges SET current_page = ?1, current_chapter = ?2 WHERE id = ?3",
                rusqlite::params![challenge.current_page, challenge.current_chapter, challenge.id],
            )?;

            let manager = AchievementManager::new(store, at.timestamp_millis());
            let mut events = Vec::new();

            let xp_earned = XpRewards::for_reading(entry.pages_read, entry.chapters_read);
            let (_, level_up) = manager.award_xp(user, xp_earned)?;
            if xp_earned > 0 {
                events.push(GamificationEvent::XpAwarded {
                    amount: xp_earned,
                    reason: format!(
                        "{} pages, {} chapters",
                        entry.pages_read, entry.chapters_read
                    ),
                });
            }
            if let Some(up) = level_up {
                events.push(GamificationEvent::LevelUp(up));
            }

            if let Some(mirror) = store.load_mirror(user, &challenge.book)? {
                let synced =
                    sync_progress(challenge.current_chapter, challenge.current_page, &mirror);
                if synced != mirror {
                    store.save_mirror(user, &synced)?;
                }
            }

            let event = ReadingActivityEvent {
                challenge_id: challenge.id,
                pages_read: entry.pages_read,
                chapters_read: entry.chapters_read,
                end_page: entry.end_page,
                end_chapter: entry.end_chapter,
                challenge_completed: challenge.is_completed,
                timestamp: at,
            };
            events.extend(manager.check_after_reading(user, &event, local_hour(at, offset))?);

            let progress = store.load_progress(user)?;
            let leveled_up = events
                .iter()
                .any(|e| matches!(e, GamificationEvent::LevelUp(_)));
            let new_achievements = events
                .iter()
                .filter_map(|e| match e {
                    GamificationEvent::AchievementUnlocked(u) => Some(u.achievement.clone()),
                    _ => None,
                })
                .collect();

            info!(user, challenge = challenge.id, xp_earned, level = progress.level, "reading logged");
            Ok(LogOutcome {
                log: DailyReadingLog {
                    challenge_id: challenge.id,
                    date,
                    pages_read: entry.pages_read,
                    chapters_read: entry.chapters_read,
                    end_page: entry.end_page,
                    end_chapter: entry.end_chapter,
                    notes: entry.notes.clone(),
                },
                xp_earned,
                leveled_up,
                new_level: progress.level,
                progress,
                new_achievements,
                events,
            })
        })
    }

    /// Mark a challenge completed and its library entry as read
    pub fn complete_challenge(
        &self,
        user: UserId,
        challenge_id: ChallengeId,
    ) -> Result<ReadingChallenge> {
        self.in_user_tx(user, Utc::now(), |store, conn| {
            let mut challenge = load_challenge(conn, user, challenge_id)?;
            conn.execute(
                "UPDATE reading_challenges SET is_completed = 1 WHERE id = ?1",
                [challenge.id],
            )?;
            challenge.is_completed = true;

            match store.load_mirror(user, &challenge.book)? {
                Some(mirror) => {
                    let finished = finish_progress(
                        challenge.total_chapters,
                        challenge.current_chapter,
                        &mirror,
                    );
                    store.save_mirror(user, &finished)?;
                }
                None => debug!(user, book = %challenge.book, "no library entry to finish"),
            }

            info!(user, challenge = challenge.id, "challenge completed");
            Ok(challenge)
        })
    }

    /// Pause or resume a challenge. Paused challenges reject reading logs.
    pub fn set_challenge_active(
        &self,
        user: UserId,
        challenge_id: ChallengeId,
        active: bool,
    ) -> Result<ReadingChallenge> {
        self.in_user_tx(user, Utc::now(), |_, conn| {
            let mut challenge = load_challenge(conn, user, challenge_id)?;
            conn.execute(
                "UPDATE reading_challenges SET is_active = ?1 WHERE id = ?2",
                rusqlite::params![active, challenge.id],
            )?;
            challenge.is_active = active;
            info!(user, challenge = challenge.id, active, "challenge activity changed");
            Ok(challenge)
        })
    }

    /// Run `f` under the user's lock inside an immediate transaction.
    /// Commits on `Ok`, rolls back on `Err`.
    fn in_user_tx<T>(
        &self,
        user: UserId,
        at: DateTime<Utc>,
        f: impl FnOnce(&StoreTx<'_>, &Connection) -> Result<T>,
    ) -> Result<T> {
        self.locks.with_user(user, || {
            let mut conn = self.db.conn();
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let store = StoreTx::new(&tx, at.timestamp_millis());
            let value = f(&store, &tx)?;
            tx.commit()?;
            Ok(value)
        })
    }
}

fn ensure_user(conn: &Connection, user: UserId) -> Result<()> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE id = ?1", [user], |r| r.get(0))
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| ShelfError::not_found("user", user))
}

fn empty_key() -> ShelfError {
    ShelfError::InvalidInput("external key must not be empty".to_string())
}

/// External keys are stored trimmed; challenges and lookups must use the same form
fn normalize_book(book: &BookRef) -> Result<BookRef> {
    match book {
        BookRef::Internal(id) => Ok(BookRef::Internal(*id)),
        BookRef::External(key) => match key.trim() {
            "" => Err(empty_key()),
            key => Ok(BookRef::External(key.to_string())),
        },
    }
}

//! Storage seams used by the gamification logic
//!
//! The achievement manager only talks to these traits. `StoreTx` implements
//! all of them on top of one SQLite transaction so a whole reading log
//! commits or rolls back as a unit.

use std::collections::HashSet;

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension};

use super::achievements::Achievement;
use crate::domain::{BookRef, ProgressMirror, ReadingStatus, UserId, UserProgress};
use crate::error::{Result, ShelfError};

/// Read access to the achievement catalog
pub trait AchievementCatalog {
    fn lookup_achievement(&self, code: &str) -> Result<Option<Achievement>>;
}

/// Per-user experience and level
pub trait ProgressStore {
    fn load_progress(&self, user: UserId) -> Result<UserProgress>;
    fn save_progress(&self, user: UserId, progress: UserProgress) -> Result<()>;
}

/// Unlock records, one per (user, achievement)
pub trait UnlockStore {
    fn unlocked_codes(&self, user: UserId) -> Result<HashSet<String>>;

    /// Insert the unlock row unless it exists. Returns `false` when another
    /// request already recorded it.
    fn insert_unlock_if_absent(&self, user: UserId, code: &str, unlocked_at: i64) -> Result<bool>;
}

/// Library progress mirrors
pub trait MirrorStore {
    fn load_mirror(&self, user: UserId, book: &BookRef) -> Result<Option<ProgressMirror>>;
    fn save_mirror(&self, user: UserId, mirror: &ProgressMirror) -> Result<()>;
}

/// Transaction-scoped store over the shelf database
pub struct StoreTx<'a> {
    conn: &'a Connection,
    now_ms: i64,
}

impl<'a> StoreTx<'a> {
    pub fn new(conn: &'a Connection, now_ms: i64) -> Self {
        Self { conn, now_ms }
    }
}

impl AchievementCatalog for StoreTx<'_> {
    fn lookup_achievement(&self, code: &str) -> Result<Option<Achievement>> {
        let found = self
            .conn
            .query_row(
                "SELECT code, name, description, icon_name, xp_reward FROM achievements WHERE code = ?1",
                [code],
                |r| {
                    Ok(Achievement {
                        code: r.get(0)?,
                        name: r.get(1)?,
                        description: r.get(2)?,
                        icon_name: r.get(3)?,
                        experience_reward: r.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }
}

impl ProgressStore for StoreTx<'_> {
    fn load_progress(&self, user: UserId) -> Result<UserProgress> {
        let progress = self
            .conn
            .query_row(
                "SELECT experience, level FROM users WHERE id = ?1",
                [user],
                |r| {
                    Ok(UserProgress {
                        experience: r.get(0)?,
                        level: r.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| ShelfError::not_found("user", user))?;

        if progress.level < 1 {
            return Err(ShelfError::Corrupt(format!(
                "user {} has level {}",
                user, progress.level
            )));
        }
        Ok(progress)
    }

    fn save_progress(&self, user: UserId, progress: UserProgress) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE users SET experience = ?1, level = ?2 WHERE id = ?3",
            rusqlite::params![progress.experience, progress.level, user],
        )?;
        if updated == 0 {
            return Err(ShelfError::not_found("user", user));
        }
        Ok(())
    }
}

impl UnlockStore for StoreTx<'_> {
    fn unlocked_codes(&self, user: UserId) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT code FROM user_achievements WHERE user_id = ?1")?;
        let codes = stmt
            .query_map([user], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(codes)
    }

    fn insert_unlock_if_absent(&self, user: UserId, code: &str, unlocked_at: i64) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO user_achievements (user_id, code, earned_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![user, code, unlocked_at],
        )?;
        Ok(inserted == 1)
    }
}

impl MirrorStore for StoreTx<'_> {
    fn load_mirror(&self, user: UserId, book: &BookRef) -> Result<Option<ProgressMirror>> {
        let row = match book {
            BookRef::Internal(book_id) => self
                .conn
                .query_row(
                    "SELECT status, current_chapter, total_chapters FROM user_books
                     WHERE user_id = ?1 AND book_id = ?2",
                    rusqlite::params![user, book_id],
                    mirror_columns,
                )
                .optional()?,
            BookRef::External(key) => self
                .conn
                .query_row(
                    "SELECT status, current_chapter, total_chapters FROM user_books_external
                     WHERE user_id = ?1 AND ol_key = ?2",
                    rusqlite::params![user, key],
                    mirror_columns,
                )
                .optional()?,
        };

        row.map(|(status, current_chapter, total_chapters)| {
            let status = ReadingStatus::from_str(&status)
                .ok_or_else(|| ShelfError::Corrupt(format!("unknown reading status '{}'", status)))?;
            Ok(ProgressMirror {
                book: book.clone(),
                status,
                current_chapter,
                total_chapters,
            })
        })
        .transpose()
    }

    fn save_mirror(&self, user: UserId, mirror: &ProgressMirror) -> Result<()> {
        let (table, key_column, key) = match &mirror.book {
            BookRef::Internal(book_id) => ("user_books", "book_id", Value::Integer(*book_id)),
            BookRef::External(key) => ("user_books_external", "ol_key", Value::Text(key.clone())),
        };
        let sql = format!(
            "UPDATE {table} SET status = ?1, current_chapter = ?2, total_chapters = ?3, updated_at = ?4
             WHERE user_id = ?5 AND {key_column} = ?6"
        );
        self.conn.execute(
            &sql,
            rusqlite::params![
                mirror.status.as_str(),
                mirror.current_chapter,
                mirror.total_chapters,
                self.now_ms,
                user,
                key,
            ],
        )?;
        Ok(())
    }
}

fn mirror_columns(r: &rusqlite::Row<'_>) -> rusqlite::Result<(String, u32, u32)> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?))
}

//! Reading progress and gamification storage
//!
//! Tracks users, library entries, reading challenges, daily logs, XP, levels
//! and achievements in a SQLite database (`~/.shelfquest/shelf.db`).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │  ShelfRecorder  │     │   ShelfQuery    │
//! │ (logs, unlocks) │     │ (profile, plan) │
//! └────────┬────────┘     └────────┬────────┘
//!          │ UserLocks + tx        │
//!          └───────────┬───────────┘
//!                      ▼
//!            ~/.shelfquest/shelf.db
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let shelf = ShelfManager::new(0)?;
//!
//! // Log a day of reading
//! let outcome = shelf.recorder().log_reading(user, challenge, &entry, Utc::now())?;
//!
//! // Query for the profile page
//! let summary = shelf.query().summary(user, Utc::now(), 5)?;
//! ```

pub mod achievements;
mod db;
mod locks;
mod models;
mod queries;
mod recorder;
mod schedule;
pub mod store;
mod sync;
mod time_bucket;

pub use db::ShelfDb;
pub use locks::UserLocks;
pub use models::{
    AchievementStatus, LogOutcome, PlanDay, ReadingPlan, ReadingSummary, ReadingTotals,
};
pub use queries::ShelfQuery;
pub use recorder::ShelfRecorder;
pub use schedule::{plan_for, MAX_PLAN_DAYS};
pub use sync::{finish_progress, sync_progress};
pub use time_bucket::{clock_offset, day_string, local_day, local_hour, parse_day};

use std::path::Path;

use anyhow::Result;
use chrono::FixedOffset;

/// Central manager for the shelf database
///
/// Hands out recorders and queries that share one connection and one
/// per-user lock table.
#[derive(Clone)]
pub struct ShelfManager {
    db: ShelfDb,
    locks: UserLocks,
    offset: FixedOffset,
}

impl ShelfManager {
    /// Open the database at the default location; `utc_offset_minutes` sets
    /// the readers' wall clock
    pub fn new(utc_offset_minutes: i32) -> Result<Self> {
        Ok(Self::from_db(ShelfDb::open_default()?, utc_offset_minutes))
    }

    /// Open the database at a custom path
    pub fn with_path(path: &Path, utc_offset_minutes: i32) -> Result<Self> {
        Ok(Self::from_db(ShelfDb::open(path)?, utc_offset_minutes))
    }

    pub fn from_db(db: ShelfDb, utc_offset_minutes: i32) -> Self {
        Self {
            db,
            locks: UserLocks::new(),
            offset: clock_offset(utc_offset_minutes),
        }
    }

    /// Get a recorder for writing
    pub fn recorder(&self) -> ShelfRecorder {
        ShelfRecorder::new(self.db.clone(), self.locks.clone(), self.offset)
    }

    /// Get a query interface for reading
    pub fn query(&self) -> ShelfQuery {
        ShelfQuery::new(self.db.clone(), self.offset)
    }
}

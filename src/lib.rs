//! shelfquest - reading tracker core
//!
//! Readers shelve books, run reading challenges and log daily progress. Each
//! log earns experience, may level the reader up, unlocks one-time
//! achievements and advances the chapter counter of the matching library
//! entry.
//!
//! ## Layers
//!
//! 1. **Rules (pure)**: XP per page/chapter, level thresholds, the achievement
//!    rule registry, progress mirror sync, streaks and reading plans.
//!
//! 2. **Storage**: a SQLite database behind the storage traits in
//!    [`stats::store`], written under a per-user lock and one transaction per
//!    reading log.

pub mod config;
pub mod domain;
pub mod error;
pub mod stats;

pub use domain::*;
pub use error::{Result, ShelfError};

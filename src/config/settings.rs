//! Settings configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite database file (defaults to ~/.shelfquest/shelf.db)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Readers' wall clock as minutes east of UTC.
    /// Decides which calendar day a log belongs to and the night-owl hour.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Pages per day used for reading plans when a challenge has no daily goal
    #[serde(default = "default_daily_pages")]
    pub default_daily_pages: u32,

    /// Number of recent achievements shown in the profile summary
    #[serde(default = "default_recent_achievements")]
    pub recent_achievements: usize,
}

fn default_daily_pages() -> u32 {
    20
}

fn default_recent_achievements() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            utc_offset_minutes: 0,
            default_daily_pages: default_daily_pages(),
            recent_achievements: default_recent_achievements(),
        }
    }
}

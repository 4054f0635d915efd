use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// A registered reader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub progress: UserProgress,
    pub created_at: DateTime<Utc>,
}

/// Experience and level of one user.
///
/// `experience` is the overflow within the current level and always stays
/// below `level_threshold(level)` once a reward has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub experience: u64,
    pub level: u32,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            experience: 0,
            level: 1,
        }
    }
}

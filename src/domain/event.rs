use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChallengeId;

/// One logging action, consumed once by the gamification pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingActivityEvent {
    pub challenge_id: ChallengeId,
    pub pages_read: u32,
    pub chapters_read: u32,
    pub end_page: u32,
    pub end_chapter: u32,
    /// Completion flag of the originating challenge at the time of logging
    pub challenge_completed: bool,
    pub timestamp: DateTime<Utc>,
}

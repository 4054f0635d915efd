//! Core domain types for shelfquest

mod challenge;
mod event;
mod library;
mod user;

pub use challenge::{
    ChallengeId, ChallengeType, DailyReadingLog, NewChallenge, ReadingChallenge, ReadingLogEntry,
};
pub use event::ReadingActivityEvent;
pub use library::{Book, BookRef, LibraryEntry, ProgressMirror, ReadingStatus};
pub use user::{User, UserId, UserProgress};

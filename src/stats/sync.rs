//! Challenge → library progress propagation
//!
//! Library entries mirror the chapter counter of the challenge that reads
//! them. Mirrors only move forward: a challenge edited downward leaves the
//! stored maximum in place.

use crate::domain::{ProgressMirror, ReadingStatus};

/// Advance the mirror to the challenge's chapter counter.
///
/// Pages are tracked on the challenge only; the mirror's unit is chapters.
pub fn sync_progress(
    challenge_current_chapter: u32,
    _challenge_current_page: u32,
    mirror: &ProgressMirror,
) -> ProgressMirror {
    ProgressMirror {
        current_chapter: mirror.current_chapter.max(challenge_current_chapter),
        ..mirror.clone()
    }
}

/// Mark the mirror finished once its challenge completes.
///
/// The chapter count jumps to the challenge's declared total, or to its
/// current chapter when no total was declared.
pub fn finish_progress(
    challenge_total_chapters: u32,
    challenge_current_chapter: u32,
    mirror: &ProgressMirror,
) -> ProgressMirror {
    let target = if challenge_total_chapters > 0 {
        challenge_total_chapters
    } else {
        challenge_current_chapter
    };

    ProgressMirror {
        status: ReadingStatus::Read,
        current_chapter: mirror.current_chapter.max(target),
        ..mirror.clone()
    }
}

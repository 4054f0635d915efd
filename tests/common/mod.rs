//! Shared fixtures for shelf integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use shelfquest::stats::ShelfManager;
use shelfquest::{
    BookRef, ChallengeType, NewChallenge, ReadingChallenge, ReadingLogEntry, ReadingStatus, User,
};

pub const EXTERNAL_KEY: &str = "/works/OL893415W";

/// A seeded database in a temp dir with one reader
pub struct Fixture {
    pub dir: TempDir,
    pub shelf: ShelfManager,
    pub user: User,
}

pub fn fixture(utc_offset_minutes: i32) -> Fixture {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let shelf = ShelfManager::with_path(&dir.path().join("shelf.db"), utc_offset_minutes)
        .expect("Failed to open shelf db");
    shelf.recorder().seed_catalog().expect("Failed to seed catalog");
    let user = shelf
        .recorder()
        .create_user("ana")
        .expect("Failed to create user");
    Fixture { dir, shelf, user }
}

pub fn new_challenge(book: BookRef, total_pages: u32, total_chapters: u32) -> NewChallenge {
    NewChallenge {
        book_title: "Dune".to_string(),
        book_author: "Frank Herbert".to_string(),
        book,
        challenge_type: ChallengeType::PagesPerDay,
        total_pages,
        total_chapters,
        end_date: None,
        daily_goal_pages: 25,
        daily_goal_chapters: 0,
    }
}

impl Fixture {
    /// Shelve an external book and open a challenge on it
    pub fn external_challenge(&self, total_pages: u32, total_chapters: u32) -> ReadingChallenge {
        let recorder = self.shelf.recorder();
        let book = recorder
            .shelve_external(
                self.user.id,
                EXTERNAL_KEY,
                "Dune",
                "Frank Herbert",
                ReadingStatus::Reading,
                total_chapters,
            )
            .expect("Failed to shelve book");
        recorder
            .create_challenge(self.user.id, &new_challenge(book, total_pages, total_chapters))
            .expect("Failed to create challenge")
    }
}

pub fn entry(pages: u32, chapters: u32, end_page: u32, end_chapter: u32) -> ReadingLogEntry {
    ReadingLogEntry {
        pages_read: pages,
        chapters_read: chapters,
        end_page,
        end_chapter,
        ..Default::default()
    }
}

pub fn at(y: i32, m: u32, d: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap()
}

//! Achievement unlocks driven through the reading log

mod common;

use std::collections::HashSet;
use std::thread;

use common::{at, entry, fixture};
use shelfquest::stats::achievements::{AchievementId, GamificationEvent};

fn unlocked_codes(fx: &common::Fixture) -> HashSet<String> {
    fx.shelf
        .query()
        .achievements(fx.user.id)
        .unwrap()
        .into_iter()
        .filter(|s| s.earned_at.is_some())
        .map(|s| s.achievement.code)
        .collect()
}

#[test]
fn test_night_owl_unlocks_once_with_reward() {
    let fx = fixture(0);
    let challenge = fx.external_challenge(600, 48);
    let recorder = fx.shelf.recorder();

    let outcome = recorder
        .log_reading(fx.user.id, challenge.id, &entry(10, 0, 10, 0), at(2026, 5, 4, 23))
        .unwrap();
    assert_eq!(outcome.xp_earned, 20);
    assert_eq!(outcome.new_achievements.len(), 1);
    assert_eq!(outcome.new_achievements[0].code, AchievementId::NightOwl.as_str());
    // Reading XP plus the 50 XP reward
    assert_eq!(outcome.progress.experience, 70);

    let again = recorder
        .log_reading(fx.user.id, challenge.id, &entry(10, 0, 20, 0), at(2026, 5, 5, 23))
        .unwrap();
    assert!(again.new_achievements.is_empty());
    assert_eq!(again.progress.experience, 90);

    assert_eq!(unlocked_codes(&fx), HashSet::from(["night_owl".to_string()]));
}

#[test]
fn test_night_owl_hour_window() {
    for (hour, fires) in [(22, false), (23, true), (0, true), (4, true), (5, false), (12, false)] {
        let fx = fixture(0);
        let challenge = fx.external_challenge(600, 48);
        let outcome = fx
            .shelf
            .recorder()
            .log_reading(fx.user.id, challenge.id, &entry(1, 0, 1, 0), at(2026, 5, 4, hour))
            .unwrap();
        assert_eq!(!outcome.new_achievements.is_empty(), fires, "hour {hour}");
    }
}

#[test]
fn test_night_owl_uses_local_hour() {
    let fx = fixture(120);
    let challenge = fx.external_challenge(600, 48);

    // 21:00 UTC is 23:00 at UTC+2
    let outcome = fx
        .shelf
        .recorder()
        .log_reading(fx.user.id, challenge.id, &entry(5, 0, 5, 0), at(2026, 5, 4, 21))
        .unwrap();
    assert_eq!(outcome.new_achievements.len(), 1);
    assert_eq!(outcome.new_achievements[0].code, "night_owl");
}

#[test]
fn test_first_book_after_completion() {
    let fx = fixture(0);
    let challenge = fx.external_challenge(600, 48);
    let recorder = fx.shelf.recorder();

    let before = recorder
        .log_reading(fx.user.id, challenge.id, &entry(10, 1, 10, 1), at(2026, 5, 4, 12))
        .unwrap();
    assert!(before.new_achievements.is_empty());

    recorder.complete_challenge(fx.user.id, challenge.id).unwrap();

    // 30 + 20 XP of reading, then the 100 XP reward crosses level 1
    let after = recorder
        .log_reading(fx.user.id, challenge.id, &entry(10, 0, 20, 1), at(2026, 5, 5, 12))
        .unwrap();
    assert_eq!(after.new_achievements.len(), 1);
    assert_eq!(after.new_achievements[0].code, "first_book");
    assert!(after.leveled_up);
    assert_eq!(after.new_level, 2);
    assert_eq!(after.progress.experience, 50);
    assert!(after
        .events
        .iter()
        .any(|e| matches!(e, GamificationEvent::AchievementUnlocked(_))));

    let summary = fx.shelf.query().summary(fx.user.id, at(2026, 5, 5, 13), 5).unwrap();
    assert_eq!(summary.recent_achievements.len(), 1);
    assert_eq!(summary.recent_achievements[0].achievement.code, "first_book");
}

#[test]
fn test_streak_and_social_never_unlock_from_logs() {
    let fx = fixture(0);
    let challenge = fx.external_challenge(600, 48);
    let recorder = fx.shelf.recorder();

    for day in 1..=8 {
        recorder
            .log_reading(fx.user.id, challenge.id, &entry(5, 0, day * 5, 0), at(2026, 5, day, 12))
            .unwrap();
    }

    let codes = unlocked_codes(&fx);
    assert!(!codes.contains("streak_7"));
    assert!(!codes.contains("social_butterfly"));
    assert_eq!(fx.shelf.query().summary(fx.user.id, at(2026, 5, 8, 13), 5).unwrap().totals.streak, 8);
}

#[test]
fn test_progress_and_unlocks_persist_across_challenges() {
    let fx = fixture(0);
    let first = fx.external_challenge(600, 48);
    let recorder = fx.shelf.recorder();

    // 400 + 90 reading XP and the 50 XP night owl reward
    let outcome = recorder
        .log_reading(fx.user.id, first.id, &entry(200, 9, 200, 9), at(2026, 5, 4, 23))
        .unwrap();
    assert_eq!(outcome.new_achievements.len(), 1);
    let before = outcome.progress;
    assert_eq!(before.level, 3);
    assert_eq!(before.experience, 158);

    let second = recorder
        .create_challenge(
            fx.user.id,
            &common::new_challenge(shelfquest::BookRef::External("/works/OL2W".into()), 300, 20),
        )
        .unwrap();
    let again = recorder
        .log_reading(fx.user.id, second.id, &entry(0, 0, 0, 0), at(2026, 5, 5, 23))
        .unwrap();
    assert!(again.new_achievements.is_empty());
    assert_eq!(again.progress, before);

    assert_eq!(unlocked_codes(&fx).len(), 1);
    let library = fx.shelf.query().library(fx.user.id).unwrap();
    assert_eq!(library[0].progress.current_chapter, 9);
}

#[test]
fn test_achievements_listing_covers_catalog() {
    let fx = fixture(0);
    let challenge = fx.external_challenge(600, 48);
    fx.shelf
        .recorder()
        .log_reading(fx.user.id, challenge.id, &entry(1, 0, 1, 0), at(2026, 5, 4, 23))
        .unwrap();

    let statuses = fx.shelf.query().achievements(fx.user.id).unwrap();
    assert_eq!(statuses.len(), AchievementId::all().len());
    // Unlocked entries sort first
    assert_eq!(statuses[0].achievement.code, "night_owl");
    assert!(statuses[0].earned_at.is_some());
    assert!(statuses[1..].iter().all(|s| s.earned_at.is_none()));
}

#[test]
fn test_concurrent_logs_unlock_exactly_once() {
    let fx = fixture(0);
    let challenge = fx.external_challenge(600, 48);

    let unlock_events: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shelf = fx.shelf.clone();
                let user = fx.user.id;
                let challenge = challenge.id;
                s.spawn(move || {
                    let outcome = shelf
                        .recorder()
                        .log_reading(user, challenge, &entry(0, 0, 0, 0), at(2026, 5, 4, 23))
                        .unwrap();
                    outcome.new_achievements.len()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(unlock_events, 1);
    assert_eq!(unlocked_codes(&fx).len(), 1);
    let user = fx.shelf.query().user(fx.user.id).unwrap();
    assert_eq!(user.progress.experience, 50);
    assert_eq!(user.progress.level, 1);
}

#[test]
fn test_concurrent_logs_from_separate_handles() {
    let fx = fixture(0);
    let challenge = fx.external_challenge(600, 48);
    let path = fx.dir.path().join("shelf.db");

    // Each handle has its own connection and lock table
    let handles: Vec<_> = (0..4)
        .map(|_| shelfquest::stats::ShelfManager::with_path(&path, 0).unwrap())
        .collect();

    thread::scope(|s| {
        for shelf in handles {
            let user = fx.user.id;
            let challenge = challenge.id;
            s.spawn(move || {
                shelf
                    .recorder()
                    .log_reading(user, challenge, &entry(0, 0, 0, 0), at(2026, 5, 4, 23))
                    .unwrap();
            });
        }
    });

    assert_eq!(unlocked_codes(&fx).len(), 1);
    assert_eq!(fx.shelf.query().user(fx.user.id).unwrap().progress.experience, 50);
}

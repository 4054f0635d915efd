//! Achievement listing and profile summary

use anyhow::Result;
use chrono::{TimeZone, Utc};

use shelfquest::config::Config;
use shelfquest::stats::ShelfManager;

use super::truncate;

fn format_earned(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Catalog with the reader's unlocks first
pub async fn achievements_command(shelf: &ShelfManager, username: &str) -> Result<()> {
    let query = shelf.query();
    let user = query.user_by_name(username)?;
    let statuses = query.achievements(user.id)?;

    if statuses.is_empty() {
        println!("The achievement catalog is empty. Run `shelfquest seed` first.");
        return Ok(());
    }

    let unlocked = statuses.iter().filter(|s| s.earned_at.is_some()).count();
    println!("{unlocked}/{} achievements unlocked\n", statuses.len());

    for status in statuses {
        let mark = if status.earned_at.is_some() { "x" } else { " " };
        let earned = status.earned_at.map(format_earned).unwrap_or_default();
        println!(
            "[{mark}] {:<22} {:>4} XP  {:<44} {}",
            status.achievement.name,
            status.achievement.experience_reward,
            truncate(&status.achievement.description, 42),
            earned
        );
    }
    Ok(())
}

pub async fn profile_command(
    shelf: &ShelfManager,
    config: &Config,
    username: &str,
    json: bool,
) -> Result<()> {
    let query = shelf.query();
    let user = query.user_by_name(username)?;
    let summary = query.summary(user.id, Utc::now(), config.settings.recent_achievements)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", summary.username);
    println!(
        "Level {}  ({} / {} XP, {:.0}%)",
        summary.player.level,
        summary.player.experience,
        summary.player.next_level_xp,
        summary.xp_progress * 100.0
    );
    println!();
    println!("Pages read:     {}", summary.totals.total_pages);
    println!("Chapters read:  {}", summary.totals.total_chapters);
    println!("Books finished: {}", summary.totals.books_finished);
    println!("Current streak: {} days", summary.totals.streak);

    if !summary.recent_achievements.is_empty() {
        println!("\nRecent achievements:");
        for status in &summary.recent_achievements {
            println!(
                "  {:<22} {}",
                status.achievement.name,
                status.earned_at.map(format_earned).unwrap_or_default()
            );
        }
    }
    Ok(())
}

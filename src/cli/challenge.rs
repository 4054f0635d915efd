//! Reading challenge commands

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Subcommand;

use shelfquest::config::Config;
use shelfquest::stats::achievements::GamificationEvent;
use shelfquest::stats::{parse_day, ShelfManager};
use shelfquest::{BookRef, ChallengeType, NewChallenge, ReadingLogEntry};

use super::truncate;

#[derive(Subcommand)]
pub enum ChallengeCommand {
    /// Start a reading challenge for a book
    Create {
        username: String,
        title: String,

        #[arg(long, default_value = "")]
        author: String,

        /// Local catalog book id
        #[arg(long, conflicts_with = "external")]
        book_id: Option<i64>,

        /// External catalog key (e.g. /works/OL45804W)
        #[arg(long)]
        external: Option<String>,

        /// finish_by_date, pages_per_day, chapters_per_day or custom
        #[arg(long = "type", default_value = "pages_per_day")]
        challenge_type: String,

        #[arg(long, default_value_t = 0)]
        pages: u32,

        #[arg(long, default_value_t = 0)]
        chapters: u32,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,

        #[arg(long, default_value_t = 0)]
        daily_pages: u32,

        #[arg(long, default_value_t = 0)]
        daily_chapters: u32,
    },

    /// List a reader's challenges
    List {
        username: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log a day of reading
    Log {
        username: String,
        challenge_id: i64,

        #[arg(long, default_value_t = 0)]
        pages: u32,

        #[arg(long, default_value_t = 0)]
        chapters: u32,

        /// Page reached at the end of the session
        #[arg(long, default_value_t = 0)]
        end_page: u32,

        /// Chapter reached at the end of the session
        #[arg(long, default_value_t = 0)]
        end_chapter: u32,

        #[arg(long, default_value = "")]
        notes: String,

        /// Day to log against (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a challenge completed
    Complete { username: String, challenge_id: i64 },

    /// Pause a challenge; paused challenges reject logs
    Pause { username: String, challenge_id: i64 },

    /// Resume a paused challenge
    Resume { username: String, challenge_id: i64 },

    /// Show a day-by-day reading plan
    Plan {
        username: String,
        challenge_id: i64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn challenge_command(
    shelf: &ShelfManager,
    config: &Config,
    cmd: ChallengeCommand,
) -> Result<()> {
    let recorder = shelf.recorder();
    let query = shelf.query();

    match cmd {
        ChallengeCommand::Create {
            username,
            title,
            author,
            book_id,
            external,
            challenge_type,
            pages,
            chapters,
            end_date,
            daily_pages,
            daily_chapters,
        } => {
            let user = query.user_by_name(&username)?;
            let challenge_type = ChallengeType::from_str(&challenge_type)
                .ok_or_else(|| anyhow!("Invalid challenge type: {}", challenge_type))?;
            let book = match (book_id, external) {
                (Some(id), _) => BookRef::Internal(id),
                (None, Some(key)) => BookRef::External(key),
                (None, None) => return Err(anyhow!("Pass --book-id or --external")),
            };
            let end_date = end_date.as_deref().map(parse_day).transpose()?;

            let challenge = recorder.create_challenge(
                user.id,
                &NewChallenge {
                    book_title: title,
                    book_author: author,
                    book,
                    challenge_type,
                    total_pages: pages,
                    total_chapters: chapters,
                    end_date,
                    daily_goal_pages: daily_pages,
                    daily_goal_chapters: daily_chapters,
                },
            )?;
            println!(
                "Created challenge {} for \"{}\" ({})",
                challenge.id, challenge.book_title, challenge.challenge_type
            );
        }
        ChallengeCommand::List { username, json } => {
            let user = query.user_by_name(&username)?;
            let challenges = query.challenges(user.id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&challenges)?);
                return Ok(());
            }
            if challenges.is_empty() {
                println!("No challenges yet.");
                return Ok(());
            }

            println!(
                "{:<6} {:<30} {:<18} {:<12} {:<12} {:<10}",
                "ID", "BOOK", "TYPE", "PAGES", "CHAPTERS", "STATE"
            );
            println!("{}", "-".repeat(92));
            for c in challenges {
                let state = if c.is_completed {
                    "done"
                } else if c.is_active {
                    "active"
                } else {
                    "paused"
                };
                println!(
                    "{:<6} {:<30} {:<18} {:<12} {:<12} {:<10}",
                    c.id,
                    truncate(&c.book_title, 28),
                    c.challenge_type.as_str(),
                    format!("{}/{}", c.current_page, c.total_pages),
                    format!("{}/{}", c.current_chapter, c.total_chapters),
                    state,
                );
            }
        }
        ChallengeCommand::Log {
            username,
            challenge_id,
            pages,
            chapters,
            end_page,
            end_chapter,
            notes,
            date,
            json,
        } => {
            let user = query.user_by_name(&username)?;
            let date = date
                .as_deref()
                .map(parse_day)
                .transpose()
                .context("Invalid --date")?;
            let entry = ReadingLogEntry {
                pages_read: pages,
                chapters_read: chapters,
                end_page,
                end_chapter,
                notes,
                date,
            };
            let outcome = recorder.log_reading(user.id, challenge_id, &entry, Utc::now())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            println!(
                "Logged {} pages and {} chapters on {}",
                outcome.log.pages_read, outcome.log.chapters_read, outcome.log.date
            );
            for event in &outcome.events {
                match event {
                    GamificationEvent::XpAwarded { amount, reason } => {
                        println!("  +{amount} XP ({reason})")
                    }
                    GamificationEvent::LevelUp(level_up) => {
                        println!("  Level up! Now level {}", level_up.new_level)
                    }
                    GamificationEvent::AchievementUnlocked(unlocked) => {
                        println!("  Achievement unlocked: {}", unlocked.achievement.name)
                    }
                }
            }
            println!(
                "Level {} with {} XP",
                outcome.progress.level, outcome.progress.experience
            );
        }
        ChallengeCommand::Complete {
            username,
            challenge_id,
        } => {
            let user = query.user_by_name(&username)?;
            let challenge = recorder.complete_challenge(user.id, challenge_id)?;
            println!("Completed \"{}\"", challenge.book_title);
        }
        ChallengeCommand::Pause {
            username,
            challenge_id,
        } => {
            let user = query.user_by_name(&username)?;
            let challenge = recorder.set_challenge_active(user.id, challenge_id, false)?;
            println!("Paused \"{}\"", challenge.book_title);
        }
        ChallengeCommand::Resume {
            username,
            challenge_id,
        } => {
            let user = query.user_by_name(&username)?;
            let challenge = recorder.set_challenge_active(user.id, challenge_id, true)?;
            println!("Resumed \"{}\"", challenge.book_title);
        }
        ChallengeCommand::Plan {
            username,
            challenge_id,
            json,
        } => {
            let user = query.user_by_name(&username)?;
            let plan = query.plan(
                user.id,
                challenge_id,
                Utc::now(),
                config.settings.default_daily_pages,
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
                return Ok(());
            }
            if plan.schedule.is_empty() {
                println!("Nothing left to read.");
                return Ok(());
            }
            for day in plan.schedule {
                println!("Day {:>2}: {:>4} pages  {}", day.day, day.pages_to_read, day.description);
            }
        }
    }
    Ok(())
}

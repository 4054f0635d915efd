//! Reader management commands

use anyhow::Result;
use clap::Subcommand;

use shelfquest::stats::achievements::PlayerStats;
use shelfquest::stats::ShelfManager;

#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a new reader
    Add { username: String },

    /// Show a reader's level and experience
    Show { username: String },
}

pub async fn user_command(shelf: &ShelfManager, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::Add { username } => {
            let user = shelf.recorder().create_user(&username)?;
            println!("Created user {} (id {})", user.username, user.id);
        }
        UserCommand::Show { username } => {
            let user = shelf.query().user_by_name(&username)?;
            let stats = PlayerStats::new(user.progress);
            println!("User:       {} (id {})", user.username, user.id);
            println!("Level:      {}", stats.level);
            println!(
                "Experience: {} / {} ({:.0}%)",
                stats.experience,
                stats.next_level_xp,
                stats.progress_to_next() * 100.0
            );
            println!("Joined:     {}", user.created_at.format("%Y-%m-%d"));
        }
    }
    Ok(())
}

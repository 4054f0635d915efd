use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shelfquest::config::Config;
use shelfquest::stats::ShelfManager;

mod cli;

use cli::challenge::ChallengeCommand;
use cli::library::{BookCommand, ShelfCommand};
use cli::user::UserCommand;

#[derive(Parser)]
#[command(name = "shelfquest")]
#[command(about = "Reading tracker - challenges, library progress, XP and achievements")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.shelfquest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Load the built-in achievements into the catalog
    Seed,

    /// Manage readers
    #[command(subcommand)]
    User(UserCommand),

    /// Manage the local book catalog
    #[command(subcommand)]
    Book(BookCommand),

    /// Manage a reader's library
    #[command(subcommand)]
    Shelf(ShelfCommand),

    /// Reading challenges and daily logs
    #[command(subcommand)]
    Challenge(ChallengeCommand),

    /// List the achievement catalog with a reader's unlocks
    Achievements { username: String },

    /// Show level, reading totals and recent achievements
    Profile {
        username: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init { force } = cli.command {
        let path = cli.config.unwrap_or_else(Config::global_config_path);
        return cli::init::init_command(&path, force).await;
    }

    let mut config = Config::load_from(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.settings.database_path = Some(db);
    }
    let shelf = ShelfManager::with_path(&config.database_path(), config.settings.utc_offset_minutes)?;

    match cli.command {
        // Handled before the database is opened
        Commands::Init { .. } => {}
        Commands::Seed => cli::init::seed_command(&shelf).await?,
        Commands::User(cmd) => cli::user::user_command(&shelf, cmd).await?,
        Commands::Book(cmd) => cli::library::book_command(&shelf, cmd).await?,
        Commands::Shelf(cmd) => cli::library::shelf_command(&shelf, cmd).await?,
        Commands::Challenge(cmd) => cli::challenge::challenge_command(&shelf, &config, cmd).await?,
        Commands::Achievements { username } => {
            cli::profile::achievements_command(&shelf, &username).await?
        }
        Commands::Profile { username, json } => {
            cli::profile::profile_command(&shelf, &config, &username, json).await?
        }
    }

    Ok(())
}

//! Init and seed commands

use std::path::Path;

use anyhow::{bail, Result};

use shelfquest::config::Config;
use shelfquest::stats::ShelfManager;

/// Write a default config file to `config_path`
pub async fn init_command(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    Config::default().save_to_file(config_path)?;
    println!("Created: {}", config_path.display());

    Ok(())
}

/// Load the built-in achievements into the catalog
pub async fn seed_command(shelf: &ShelfManager) -> Result<()> {
    let count = shelf.recorder().seed_catalog()?;
    println!("Seeded {count} achievements");
    Ok(())
}

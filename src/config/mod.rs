//! Configuration loading and management

mod io;
mod settings;

pub use settings::Settings;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from an explicit path, or from `~/.shelfquest/config.toml` when
    /// none is given. A missing global file yields the defaults.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Resolved database location
    pub fn database_path(&self) -> PathBuf {
        self.settings
            .database_path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("shelf.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[settings]\nutc_offset_minutes = -300\ndefault_daily_pages = 35\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.settings.utc_offset_minutes, -300);
        assert_eq!(config.settings.default_daily_pages, 35);
        assert_eq!(config.settings.recent_achievements, 5);
        assert!(config.settings.database_path.is_none());
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.settings.utc_offset_minutes, 0);
        assert_eq!(config.settings.default_daily_pages, 20);
    }

    #[test]
    fn test_database_path_override() {
        let mut config = Config::default();
        config.settings.database_path = Some(PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}

//! Runtime configuration loaded from a TOML file.
//!
//! ```toml
//! [paths]
//! data_dir = "data"
//! save_dir = "data/save_games"
//!
//! [game]
//! revive_cost = 50
//!
//! [logging]
//! level = "info"
//! ```

use crate::core::constants::REVIVE_COST;
use crate::core::{GameError, GameResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding quests.txt and items.txt.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Gold charged to revive a fallen character.
    #[serde(default = "default_revive_cost")]
    pub revive_cost: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "chronicles")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("data"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn default_save_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("save_games"))
        .unwrap_or_else(|| PathBuf::from("data/save_games"))
}

fn default_revive_cost() -> u64 {
    REVIVE_COST
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            save_dir: default_save_dir(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            revive_cost: default_revive_cost(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Path of the config file when none is given on the command line.
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Reads a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> GameResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            GameError::InvalidConfig(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the default config to `path`, creating parent directories.
    pub fn create_default(path: &Path) -> GameResult<()> {
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| GameError::InvalidConfig(format!("failed to serialize defaults: {}", e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.paths.data_dir.as_os_str().is_empty() {
            return Err(GameError::InvalidConfig("paths.data_dir is empty".to_string()));
        }
        if self.paths.save_dir.as_os_str().is_empty() {
            return Err(GameError::InvalidConfig("paths.save_dir is empty".to_string()));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(GameError::InvalidConfig(format!(
                "unknown logging.level {:?}",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// The configured level as a `log` filter.
    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.game.revive_cost, 50);
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[game]\nrevive_cost = 75\n\n[logging]\nlevel = \"debug\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.game.revive_cost, 75);
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_paths_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[paths]\ndata_dir = \"/srv/rpg\"\nsave_dir = \"/srv/rpg/saves\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.paths.data_dir, PathBuf::from("/srv/rpg"));
        assert_eq!(config.paths.save_dir, PathBuf::from("/srv/rpg/saves"));
    }

    #[test]
    fn test_rejects_bad_level_and_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(GameError::InvalidConfig(_))));

        fs::write(&path, "[game\nrevive_cost = ").unwrap();
        assert!(matches!(Config::load(&path), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_create_default_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::create_default(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }
}

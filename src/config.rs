use crate::error::{Result, VidplateError};
use log::LevelFilter;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_DIRNAME: &str = ".vidplate";
pub const DB_FILENAME: &str = "vidplate.db";
pub const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Get the vidplate configuration directory
pub fn get_config_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(CONFIG_DIRNAME))
        .unwrap_or_else(|_| PathBuf::from(CONFIG_DIRNAME))
}

/// Get the path to the default database file
pub fn get_db_file_path() -> PathBuf {
    get_config_dir().join(DB_FILENAME)
}

/// Get the path to the optional config file
pub fn get_config_file_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILENAME)
}

/// Settings read from `~/.vidplate/config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file to use instead of `~/.vidplate/vidplate.db`
    pub database_path: Option<PathBuf>,
    /// Log level such as `info` or `debug`; `RUST_LOG` still wins
    pub log_level: Option<String>,
}

impl Config {
    /// Load the config from its default location
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_file_path())
    }

    /// A missing or blank file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| VidplateError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the database path: explicit override, then config, then default
    pub fn database_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.database_path.clone())
            .unwrap_or_else(get_db_file_path)
    }

    pub fn log_filter(&self) -> Result<LevelFilter> {
        match &self.log_level {
            None => Ok(DEFAULT_LOG_LEVEL),
            Some(level) => LevelFilter::from_str(level.trim()).map_err(|_| {
                VidplateError::InvalidConfig(format!("unknown log level '{}'", level))
            }),
        }
    }
}

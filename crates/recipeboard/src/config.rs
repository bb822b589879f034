//! Configuration management for recipeboard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::favorites::DEFAULT_FAVORITES_KEY;
use crate::view::DEFAULT_QUICK_MAX_MINUTES;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "recipeboard";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "favorites.db";

/// Longest accepted search debounce.
const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RECIPEBOARD_`, sections separated
///    by `__`, e.g. `RECIPEBOARD_SEARCH__DEBOUNCE_MS=150`)
/// 2. TOML config file at `~/.config/recipeboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Search configuration.
    pub search: SearchConfig,
    /// View configuration.
    pub view: ViewConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/recipeboard/favorites.db`
    pub database_path: Option<PathBuf>,
    /// Key the favorites list is stored under.
    pub favorites_key: String,
}

/// Search-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Idle time after the last keystroke before a typed query runs.
    pub debounce_ms: u64,
}

/// Output format for rendered boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain text cards.
    #[default]
    Plain,
    /// HTML card markup.
    Html,
    /// One JSON object per frame.
    Json,
}

/// View-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Recipes strictly faster than this count as "quick".
    pub quick_max_minutes: u32,
    /// Default output format.
    pub format: OutputFormat,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            quick_max_minutes: DEFAULT_QUICK_MAX_MINUTES,
            format: OutputFormat::Plain,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RECIPEBOARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.favorites_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "favorites_key must not be empty".to_string(),
            });
        }

        if self.search.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "debounce_ms ({}) cannot exceed {MAX_DEBOUNCE_MS}",
                    self.search.debounce_ms
                ),
            });
        }

        if self.view.quick_max_minutes == 0 {
            return Err(Error::ConfigValidation {
                message: "quick_max_minutes must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the search debounce as a Duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}

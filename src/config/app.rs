//! Main application configuration
//!
//! This module defines the configuration structures for the club ladder,
//! including TOML file loading, environment variable overrides and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub rating: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where the ladder keeps its files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the data files
    pub data_dir: PathBuf,
    /// Player table file name, relative to `data_dir`
    pub players_file: String,
    /// Account table file name, relative to `data_dir`
    pub accounts_file: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "club-ladder".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            players_file: "players.csv".to_string(),
            accounts_file: "accounts.csv".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("LADDER_SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LADDER_LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Storage settings
        if let Ok(dir) = env::var("LADDER_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(file) = env::var("LADDER_PLAYERS_FILE") {
            self.storage.players_file = file;
        }
        if let Ok(file) = env::var("LADDER_ACCOUNTS_FILE") {
            self.storage.accounts_file = file;
        }

        // Rating settings
        if let Ok(k) = env::var("LADDER_K_FACTOR") {
            self.rating.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid LADDER_K_FACTOR value: {}", k))?;
        }
        if let Ok(points) = env::var("LADDER_INITIAL_POINTS") {
            self.rating.initial_points = points
                .parse()
                .map_err(|_| anyhow!("Invalid LADDER_INITIAL_POINTS value: {}", points))?;
        }
        if let Ok(bonus) = env::var("LADDER_CHAMPIONSHIP_BONUS") {
            self.rating.championship_bonus = bonus
                .parse()
                .map_err(|_| anyhow!("Invalid LADDER_CHAMPIONSHIP_BONUS value: {}", bonus))?;
        }
        if let Ok(policy) = env::var("LADDER_DRAW_POLICY") {
            self.rating.draw_policy = policy.parse()?;
        }

        Ok(())
    }

    /// Full path of the player table
    pub fn players_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.players_file)
    }

    /// Full path of the account table
    pub fn accounts_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.accounts_file)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate storage settings
    if config.storage.players_file.is_empty() {
        return Err(anyhow!("Players file name cannot be empty"));
    }
    if config.storage.accounts_file.is_empty() {
        return Err(anyhow!("Accounts file name cannot be empty"));
    }
    if config.storage.players_file == config.storage.accounts_file {
        return Err(anyhow!("Players and accounts cannot share a file"));
    }

    config.rating.validate()
}

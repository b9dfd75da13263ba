#![deny(unsafe_code)]

//! Configuration loading and validation for SuggestBot.
//!
//! Loads TOML configuration files and validates them. [`AppConfig`] is the
//! central configuration structure shared by the bot service and the CLI.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bot behaviour.
    #[serde(default)]
    pub bot: BotConfig,

    /// Where the persisted state lives.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bot behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Activity text shown as the bot's presence ("Playing ...").
    #[serde(default = "default_presence")]
    pub presence: String,

    /// Capacity of the inbound event queue feeding the bot service.
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            presence: default_presence(),
            event_queue_capacity: default_event_queue_capacity(),
        }
    }
}

fn default_presence() -> String {
    "DM me suggestions or complaints".to_string()
}

fn default_event_queue_capacity() -> usize {
    256
}

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON save file holding guild settings and suggestions.
    #[serde(default = "default_save_file")]
    pub save_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_file: default_save_file(),
        }
    }
}

fn default_save_file() -> String {
    "saveData.json".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.presence.trim().is_empty() {
            return Err(ConfigError::Validation(
                "bot.presence must not be empty".to_string(),
            ));
        }
        if self.bot.event_queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "bot.event_queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.storage.save_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.save_file must not be empty".to_string(),
            ));
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }
        Ok(())
    }

    /// The save file as a path.
    pub fn save_path(&self) -> &Path {
        Path::new(&self.storage.save_file)
    }
}

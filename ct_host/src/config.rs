//! Host configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use casual_tourney::{Mode, tournament::DEFAULT_ROUNDS_TOTAL};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "tourney-data";
const DEFAULT_TITLE: &str = "Tournament";

/// Host configuration loaded from environment variables
///
/// Title, mode and round count only seed a tournament that has no stored
/// configuration yet; afterwards the stored values win.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Directory holding the JSON stores
    pub data_dir: PathBuf,
    /// Directory the results CSV is written to
    pub export_dir: PathBuf,
    pub title: String,
    pub mode: Mode,
    pub rounds_total: u32,
}

impl HostConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `data_dir_override` - Optional data directory (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but invalid
    pub fn from_env(data_dir_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::from_lookup(data_dir_override, |key| std::env::var(key).ok())
    }

    /// Same as [`HostConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup<F>(data_dir_override: Option<PathBuf>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = data_dir_override
            .or_else(|| lookup("CT_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let export_dir = lookup("CT_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.clone());

        let title = lookup("CT_TITLE")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let mode = match lookup("CT_MODE") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "CT_MODE".to_string(),
                reason: format!("unknown mode {value:?} (use ffa, two-heads or one-vs-one)"),
            })?,
            None => Mode::FreeForAll,
        };

        let config = HostConfig {
            data_dir,
            export_dir,
            title,
            mode,
            rounds_total: parse_var_or(&lookup, "CT_ROUNDS", DEFAULT_ROUNDS_TOTAL),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds_total == 0 {
            return Err(ConfigError::Invalid {
                var: "CT_ROUNDS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired {
                var: "CT_DATA_DIR".to_string(),
                hint: "Point it at a writable directory or pass --data-dir".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback
fn parse_var_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

//! Application settings loaded from `config.toml`.
//!
//! Every field has a default so a partial (or absent) file still yields a
//! usable configuration. A file that exists but does not parse is an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "UNBOX_CONFIG";

/// Top-level configuration structure representing config.toml
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub economy: EconomyConfig,
    pub games: GamesConfig,
    pub leaderboard: LeaderboardConfig,
}

/// Where the JSON data files and the case catalog live.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding economy.json, inventory.json and market.json
    pub data_dir: PathBuf,
    /// Path to the case catalog JSON
    pub catalog_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            catalog_path: PathBuf::from("data/catalog.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EconomyConfig {
    /// Balance a new account starts with
    pub starting_balance: u64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_balance: 100,
        }
    }
}

/// Gambling game tuning.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GamesConfig {
    pub slots_cost: u64,
    /// Three of a kind pays `slots_cost * slots_payout_multiplier`
    pub slots_payout_multiplier: u64,
    pub slots_cooldown_secs: u64,
    /// A won coinflip credits `floor(amount * bet_payout_multiplier)`
    pub bet_payout_multiplier: f64,
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            slots_cost: 10,
            slots_payout_multiplier: 5,
            slots_cooldown_secs: 5,
            bet_payout_multiplier: 1.9,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub page_size: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

impl AppConfig {
    fn validate(self) -> Result<Self> {
        if self.leaderboard.page_size == 0 {
            return Err(Error::Config {
                message: "leaderboard.page_size must be greater than zero".to_string(),
            });
        }
        if !self.games.bet_payout_multiplier.is_finite() || self.games.bet_payout_multiplier < 0.0
        {
            return Err(Error::Config {
                message: "games.bet_payout_multiplier must be a non-negative number".to_string(),
            });
        }
        Ok(self)
    }
}

/// Parses configuration from a TOML string.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a value is out of range.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `$UNBOX_CONFIG` or `./config.toml`, falling back to
/// defaults when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        warn!("Config file {path} not found, using built-in defaults");
        return Ok(AppConfig::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [storage]
            data_dir = "/var/lib/unbox"
            catalog_path = "/etc/unbox/catalog.json"

            [economy]
            starting_balance = 250

            [games]
            slots_cost = 20
            slots_payout_multiplier = 8
            slots_cooldown_secs = 3
            bet_payout_multiplier = 1.5

            [leaderboard]
            page_size = 5
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/unbox"));
        assert_eq!(config.economy.starting_balance, 250);
        assert_eq!(config.games.slots_cost, 20);
        assert_eq!(config.games.bet_payout_multiplier, 1.5);
        assert_eq!(config.leaderboard.page_size, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_config("[economy]\nstarting_balance = 50\n").unwrap();
        assert_eq!(config.economy.starting_balance, 50);
        assert_eq!(config.games, GamesConfig::default());
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.leaderboard.page_size, 10);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = parse_config("[leaderboard]\npage_size = 0\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = parse_config("[economy\nstarting_balance = ");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}

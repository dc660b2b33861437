//! # Configuration
//!
//! SuperAdventure reads a single TOML file. Every key has a default, so an
//! empty file (or no file at all) gives the stock game.
//!
//! ## Sections
//!
//! - [`GameConfig`] - world, starting character and rule tweaks
//! - [`StorageConfig`] - where the player save lives
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! home_location = 1
//! starting_gold = 20
//! starting_items = [1]
//! completion_rule = "strictly_greater"
//! # seed = 42
//! # world_file = "world.json"
//!
//! [storage]
//! save_file = "PlayerData.xml"
//!
//! [logging]
//! level = "warn"
//! # file = "superadventure.log"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use superadventure::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     Config::create_default("config.toml")?;
//!     let config = Config::load("config.toml")?;
//!     println!("Saving to {}", config.storage.save_file);
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::adventure::quest::CompletionRule;
use crate::adventure::types::{ItemId, LocationId};
use crate::adventure::world::{ITEM_RUSTY_SWORD, LOCATION_HOME};
use crate::adventure::Rules;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Location new players start in and defeated players return to.
    #[serde(default = "default_home_location")]
    pub home_location: LocationId,
    #[serde(default = "default_starting_gold")]
    pub starting_gold: u32,
    #[serde(default = "default_starting_items")]
    pub starting_items: Vec<ItemId>,
    /// How quest hand-in quantities are compared. `strictly_greater` matches
    /// the classic game, where one spare item is needed.
    #[serde(default)]
    pub completion_rule: CompletionRule,
    /// Fixed dice seed for reproducible runs. Unset means a fresh seed each launch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// JSON world seed to play instead of the built-in map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_file: Option<String>,
}

fn default_home_location() -> LocationId {
    LOCATION_HOME
}

fn default_starting_gold() -> u32 {
    20
}

fn default_starting_items() -> Vec<ItemId> {
    vec![ITEM_RUSTY_SWORD]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            home_location: default_home_location(),
            starting_gold: default_starting_gold(),
            starting_items: default_starting_items(),
            completion_rule: CompletionRule::default(),
            seed: None,
            world_file: None,
        }
    }
}

impl GameConfig {
    pub fn rules(&self) -> Rules {
        Rules {
            home_location: self.home_location,
            completion_rule: self.completion_rule,
            starting_gold: self.starting_gold,
            starting_items: self.starting_items.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_save_file")]
    pub save_file: String,
}

fn default_save_file() -> String {
    "PlayerData.xml".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_file: default_save_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Create a default configuration file
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path.display(), e))?;

        Ok(())
    }
}

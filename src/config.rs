use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{DEFAULT_COLUMNS, Identity};

const CONFIG_DIR_NAME: &str = "memory-match";
const CONFIG_FILE_NAME: &str = "config.json";

const DEFAULT_DECK: [(&str, &str); 8] = [
    ("bear", "🐻"),
    ("bird", "🐦"),
    ("cow", "🐮"),
    ("cat", "🐱"),
    ("deer", "🦌"),
    ("fox", "🦊"),
    ("owl", "🦉"),
    ("squirrel", "🐿️"),
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_deck")]
    pub deck: Vec<Identity>,
    #[serde(default = "default_columns")]
    pub columns: usize,
}

fn default_deck() -> Vec<Identity> {
    DEFAULT_DECK
        .iter()
        .map(|(name, face)| Identity::new(*name, *face))
        .collect()
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            deck: default_deck(),
            columns: default_columns(),
        }
    }
}

pub fn config_path() -> PathBuf {
    glib::user_config_dir()
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

pub fn parse_config(raw: &str) -> Result<GameConfig, ConfigError> {
    Ok(serde_json::from_str(raw)?)
}

fn read_config(path: &PathBuf) -> Result<Option<GameConfig>, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    parse_config(&raw).map(Some)
}

/// Loads the user's config, falling back to the built-in deck.
///
/// The deck itself is validated later, when the board is built.
pub fn load_config() -> GameConfig {
    let path = config_path();
    match read_config(&path) {
        Ok(Some(config)) => {
            log::info!("loaded config from {}", path.display());
            config
        }
        Ok(None) => GameConfig::default(),
        Err(err) => {
            log::warn!("{}: {err}; using the default deck", path.display());
            GameConfig::default()
        }
    }
}

pub fn debug_mode_enabled() -> bool {
    match std::env::var("MEMORY_MATCH_DEBUG") {
        Ok(value) => {
            let v = value.trim().to_ascii_lowercase();
            matches!(v.as_str(), "1" | "true" | "yes" | "on")
        }
        Err(_) => false,
    }
}

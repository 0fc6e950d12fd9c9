use std::{env, fmt::Display, str::FromStr};

use dotenvy::dotenv;
use lettings_server::DEFAULT_PORT;
use log::{debug, LevelFilter};
use thiserror::Error;

pub const PORT_ENV: &str = "LETTINGS_SERVER_PORT";
pub const DATABASE_URL_ENV: &str = "LETTINGS_DATABASE_URL";
pub const DATABASE_NAME_ENV: &str = "LETTINGS_DATABASE_NAME";
pub const STORE_ENV: &str = "LETTINGS_STORE";
pub const LOG_LEVEL_ENV: &str = "LETTINGS_LOG_LEVEL";

pub const DEFAULT_DATABASE_URL: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE_NAME: &str = "RENTAL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LETTINGS_SERVER_PORT must be a port number, got \"{0}\"")]
    InvalidPort(String),
    #[error("LETTINGS_STORE must be \"mongo\" or \"memory\", got \"{0}\"")]
    UnknownStore(String),
    #[error("LETTINGS_LOG_LEVEL must be one of off, error, warn, info, debug or trace, got \"{0}\"")]
    InvalidLogLevel(String),
}

/// Where listings, accounts and inquiries are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    /// Nothing survives a restart
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::UnknownStore(s.to_string())),
        }
    }
}

impl Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mongo => f.write_str("mongo"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub store: StoreKind,
    /// How much the lettings crates log
    pub log_level: LevelFilter,
}

impl Config {
    /// Reads the config from the environment, after loading a `.env` file if there is one
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any source of variables, falling back to defaults for missing ones
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(PORT_ENV) {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };

        let store = match lookup(STORE_ENV) {
            Some(store) => store.parse()?,
            None => StoreKind::Mongo,
        };

        let log_level = match lookup(LOG_LEVEL_ENV) {
            Some(level) => level
                .trim()
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::InvalidLogLevel(level))?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            port,
            store,
            log_level,
            database_url: lookup(DATABASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_name: lookup(DATABASE_NAME_ENV)
                .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
        })
    }
}

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use user_crud_shared::db::DatabaseConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_DATABASE_PATH: &str = "./users.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name} `{value}`: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; unset variables fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_addr_raw
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: bind_addr_raw.clone(),
                reason: err.to_string(),
            })?;

        let database_path =
            lookup("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.into());

        let busy_timeout_ms = match lookup("DB_BUSY_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|err| ConfigError::Invalid {
                name: "DB_BUSY_TIMEOUT_MS",
                value: raw.clone(),
                reason: err.to_string(),
            })?,
            None => DEFAULT_BUSY_TIMEOUT_MS,
        };

        Ok(Self {
            bind_addr,
            database: DatabaseConfig::new(database_path)
                .with_busy_timeout(Duration::from_millis(busy_timeout_ms)),
        })
    }
}

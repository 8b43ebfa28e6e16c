use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn apply_overrides(&mut self) -> Result<()> {
        if let Some(port) = port_override(std::env::var("PORT").ok())? {
            self.general.port = port;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

/// Parses the bare `PORT` variable used by most hosting platforms.
pub(crate) fn port_override(value: Option<String>) -> Result<Option<u16>> {
    match value {
        Some(raw) if !raw.trim().is_empty() => {
            let port = raw
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid u16")?;
            Ok(Some(port))
        }
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT as u16,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
    pub connect_timeout_secs: u64,
    /// Create the `todos` table from the entity definition when it is missing.
    pub sync_schema: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS as u32,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE as u32,
            connect_timeout_secs: defaults::DEFAULT_DB_CONNECT_TIMEOUT_SECS as u64,
            sync_schema: defaults::DEFAULT_DB_SYNC_SCHEMA,
        }
    }
}

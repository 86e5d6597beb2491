//! Configuration management for Folio

use std::env;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::reader::SessionTimings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub fetch: FetchConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Upstream request timeout in seconds
    pub timeout_secs: u64,
    /// Load documents through this doc-proxy instead of fetching directly
    pub proxy_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    pub resize_debounce_ms: u64,
    pub settle_delay_ms: u64,
}

impl LayoutConfig {
    pub fn timings(&self) -> SessionTimings {
        SessionTimings {
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:./folio.db".to_string(),
            },
            fetch: FetchConfig {
                timeout_secs: 15,
                proxy_url: None,
            },
            layout: LayoutConfig {
                resize_debounce_ms: 150,
                settle_delay_ms: 100,
            },
        }
    }
}

fn parsed<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parsed("SERVER_PORT", defaults.server.port)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            fetch: FetchConfig {
                timeout_secs: parsed("FETCH_TIMEOUT_SECS", defaults.fetch.timeout_secs)?,
                proxy_url: env::var("DOC_PROXY_URL").ok().filter(|url| !url.is_empty()),
            },
            layout: LayoutConfig {
                resize_debounce_ms: parsed(
                    "RESIZE_DEBOUNCE_MS",
                    defaults.layout.resize_debounce_ms,
                )?,
                settle_delay_ms: parsed("LAYOUT_SETTLE_MS", defaults.layout.settle_delay_ms)?,
            },
        })
    }
}

//! Environment-driven configuration for both services.
//!
//! Values come from the process environment (optionally seeded from `.env`
//! by the binaries). Every loader also has a `from_lookup` form so callers
//! can supply values without touching global state.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_NOTIFY_API_URL: &str = "https://notify-api.line.me/api/notify";
pub const DEFAULT_ALERTS_FILE: &str = "alerts.json";
pub const DEFAULT_DATABASE_URL: &str = "host=localhost user=postgres dbname=signalhook";
pub const NOTIFY_TOKEN_VAR: &str = "LINE_NOTIFY_TOKEN";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment environment name (`APP_ENV`), defaults to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Where the listener binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host_raw = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_raw.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
            var: "HOST",
            value: host_raw.clone(),
            reason: e.to_string(),
        })?;

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Outbound messaging API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    pub endpoint: Url,
    pub timeout: Duration,
}

impl NotifyConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("NOTIFY_API_URL").unwrap_or_else(|| DEFAULT_NOTIFY_API_URL.to_string());
        let endpoint = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
            var: "NOTIFY_API_URL",
            value: raw.clone(),
            reason: e.to_string(),
        })?;

        let timeout = match lookup("NOTIFY_TIMEOUT_SECONDS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "NOTIFY_TIMEOUT_SECONDS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(10),
        };

        Ok(Self { endpoint, timeout })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertStoreKind {
    File(PathBuf),
    Memory,
}

/// Settings for the alert intake service.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub server: ServerConfig,
    pub notify: NotifyConfig,
    pub notify_token: String,
    pub store: AlertStoreKind,
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Fails when the notification credential is missing or blank.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let notify_token = lookup(NOTIFY_TOKEN_VAR)
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing(NOTIFY_TOKEN_VAR))?;

        let store = match lookup("ALERT_STORE").as_deref() {
            None | Some("file") => {
                let path = lookup("ALERTS_FILE").unwrap_or_else(|| DEFAULT_ALERTS_FILE.to_string());
                AlertStoreKind::File(PathBuf::from(path))
            }
            Some("memory") => AlertStoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "ALERT_STORE",
                    value: other.to_string(),
                    reason: "expected `file` or `memory`".to_string(),
                })
            }
        };

        Ok(Self {
            server: ServerConfig::from_lookup(lookup)?,
            notify: NotifyConfig::from_lookup(lookup)?,
            notify_token,
            store,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStoreKind {
    Postgres(String),
    Memory,
}

/// Settings for the strategy catalog service.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub server: ServerConfig,
    pub notify: NotifyConfig,
    pub store: CatalogStoreKind,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("CATALOG_STORE").as_deref() {
            None | Some("postgres") => CatalogStoreKind::Postgres(
                lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            ),
            Some("memory") => CatalogStoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "CATALOG_STORE",
                    value: other.to_string(),
                    reason: "expected `postgres` or `memory`".to_string(),
                })
            }
        };

        Ok(Self {
            server: ServerConfig::from_lookup(lookup)?,
            notify: NotifyConfig::from_lookup(lookup)?,
            store,
        })
    }
}

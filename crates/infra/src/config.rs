//! Configuration loading and representation.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_COLLECTION: &str = "kappaleen_osa";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Which document store backend to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Postgres { url: String, max_connections: u32 },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub collection: String,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw =
            lookup("SONGPARTS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            var: "SONGPARTS_BIND_ADDR",
            expected: "socket address",
            value: bind_raw.clone(),
        })?;

        let collection =
            lookup("SONGPARTS_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        if collection.trim().is_empty() {
            return Err(ConfigError::Empty("SONGPARTS_COLLECTION"));
        }

        let store = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            None => StoreConfig::Memory,
            Some(url) => {
                let max_connections = match lookup("SONGPARTS_DB_MAX_CONNECTIONS") {
                    None => DEFAULT_DB_MAX_CONNECTIONS,
                    Some(raw) => raw
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ConfigError::Invalid {
                            var: "SONGPARTS_DB_MAX_CONNECTIONS",
                            expected: "positive integer",
                            value: raw,
                        })?,
                };
                StoreConfig::Postgres {
                    url,
                    max_connections,
                }
            }
        };

        Ok(Self {
            bind_addr,
            collection,
            store,
        })
    }
}

//! Server configuration from environment variables
//!
//! | Variable          | Default             |
//! |-------------------|---------------------|
//! | `PORT`            | `3000`              |
//! | `MDB_HOST`        | `0.0.0.0`           |
//! | `MDB_DATA_DIR`    | `data`              |
//! | `MDB_DATA_FILE`   | `mdb_data.json`     |
//! | `MDB_STATIC_DIR`  | `public`            |
//! | `MDB_SERVER_NAME` | `MDB Data Receiver` |

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::event_store::EventStoreConfig;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Runtime configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub data_file: String,
    pub static_dir: PathBuf,
    pub server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("data"),
            data_file: "mdb_data.json".to_string(),
            static_dir: PathBuf::from("public"),
            server_name: "MDB Data Receiver".to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_lookup(&current_dir, |key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, resolving relative paths against `base`
    pub fn from_lookup<F>(base: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };

        let resolve = |key: &str, default: PathBuf| {
            let path = lookup(key).map(PathBuf::from).unwrap_or(default);
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        };

        Ok(Self {
            host: lookup("MDB_HOST").unwrap_or(defaults.host),
            port,
            data_dir: resolve("MDB_DATA_DIR", defaults.data_dir),
            data_file: lookup("MDB_DATA_FILE").unwrap_or(defaults.data_file),
            static_dir: resolve("MDB_STATIC_DIR", defaults.static_dir),
            server_name: lookup("MDB_SERVER_NAME").unwrap_or(defaults.server_name),
        })
    }

    /// Address to bind, `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_config(&self) -> EventStoreConfig {
        EventStoreConfig::new(&self.data_dir).with_file_name(self.data_file.clone())
    }

    /// Static directory, if it exists on disk
    pub fn static_dir(&self) -> Option<PathBuf> {
        self.static_dir.is_dir().then(|| self.static_dir.clone())
    }
}

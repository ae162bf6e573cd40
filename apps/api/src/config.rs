//! Server configuration.
//!
//! Configuration is loaded from environment variables (after an optional
//! `.env` file) with fallback to defaults. It is read once in `main` and
//! passed down; nothing else looks at the environment.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use stockroom_db::DbConfig;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind (`STOCKROOM_HOST`, default 127.0.0.1)
    pub host: IpAddr,

    /// TCP port (`STOCKROOM_PORT`, default 8000)
    pub port: u16,

    /// SQLite file (`DATABASE_PATH`, default stockroom.db)
    pub database_path: PathBuf,

    /// Pool size (`DB_MAX_CONNECTIONS`, default 5)
    pub db_max_connections: u32,

    /// Pool acquire timeout in seconds (`DB_CONNECT_TIMEOUT_SECS`, default 30)
    pub db_connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
            database_path: PathBuf::from("stockroom.db"),
            db_max_connections: 5,
            db_connect_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            host: parse_var("STOCKROOM_HOST", defaults.host)?,
            port: parse_var("STOCKROOM_PORT", defaults.port)?,
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            db_connect_timeout_secs: parse_var(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.db_connect_timeout_secs,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.db_max_connections)
            .connect_timeout(Duration::from_secs(self.db_connect_timeout_secs))
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_address().to_string(), "127.0.0.1:8000");

        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("stockroom.db"));
        assert_eq!(db.max_connections, 5);
        assert_eq!(db.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let port: u16 = parse_var("STOCKROOM_TEST_UNSET_VARIABLE", 8123).unwrap();
        assert_eq!(port, 8123);
    }
}

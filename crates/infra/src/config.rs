//! Configuration loading and representation.
//!
//! Everything comes from environment variables (a `.env` file is loaded by the
//! binaries before this runs). Unset variables fall back to defaults; set but
//! unparsable ones are an error.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

use crate::jobs::ExecutorConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub executor_timeout: Duration,
    /// Serve from the in-memory store instead of Postgres (dev mode).
    pub use_in_memory_store: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server: ServerConfig {
                host: var("APP_HOST", "0.0.0.0"),
                port: parse(&lookup, "APP_PORT", 8080)?,
            },
            database: DatabaseConfig {
                host: var("DB_HOST", "localhost"),
                port: parse(&lookup, "DB_PORT", 5432)?,
                user: var("DB_USER", "postgres"),
                password: var("DB_PASSWORD", ""),
                name: var("DB_NAME", "products"),
                max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            },
            executor_timeout: executor_timeout(&lookup)?,
            use_in_memory_store: parse(&lookup, "USE_IN_MEMORY_STORE", false)?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn executor(&self) -> ExecutorConfig {
        ExecutorConfig::default()
            .with_name("product-writes")
            .with_timeout(self.executor_timeout)
    }
}

impl DatabaseConfig {
    /// Connection options equivalent to
    /// `host=.. port=.. user=.. password=.. dbname=.. sslmode=disable`.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(PgSslMode::Disable)
    }
}

/// Executor deadline in whole seconds; zero is rejected.
fn executor_timeout<F>(lookup: &F) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    const KEY: &str = "EXECUTOR_TIMEOUT_SECS";
    match parse(lookup, KEY, 30u64)? {
        0 => Err(ConfigError::Invalid {
            key: KEY,
            value: lookup(KEY).unwrap_or_default(),
            reason: "must be at least 1 second".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server_address(), "0.0.0.0:8080");
        assert_eq!(cfg.database.port, 5432);
        assert_eq!(cfg.executor_timeout, Duration::from_secs(30));
        assert!(!cfg.use_in_memory_store);
    }

    #[test]
    fn reads_database_and_app_settings() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "shop"),
            ("APP_PORT", "9000"),
            ("EXECUTOR_TIMEOUT_SECS", "5"),
            ("USE_IN_MEMORY_STORE", "true"),
        ]))
        .unwrap();

        assert_eq!(cfg.database.host, "db.internal");
        assert_eq!(cfg.database.port, 6543);
        assert_eq!(cfg.database.name, "shop");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.executor().timeout, Duration::from_secs(5));
        assert!(cfg.use_in_memory_store);
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let err = AppConfig::from_lookup(lookup(&[("APP_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "APP_PORT", .. }));
    }

    #[test]
    fn rejects_zero_executor_timeout() {
        let err = AppConfig::from_lookup(lookup(&[("EXECUTOR_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "EXECUTOR_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn debug_output_hides_password() {
        let cfg = AppConfig::from_lookup(lookup(&[("DB_PASSWORD", "hunter2")])).unwrap();
        assert!(!format!("{:?}", cfg.database).contains("hunter2"));
    }
}

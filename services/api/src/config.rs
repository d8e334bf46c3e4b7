//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::collections::HashMap;
use std::net::SocketAddr;
use opion_crm_core::DEFAULT_PAGE_SIZE;
use std::num::NonZeroUsize;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_level: Level,
    pub cors_origin: String,
    pub default_page_size: NonZeroUsize,
    pub max_page_size: NonZeroUsize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(&std::env::vars().collect())
    }

    /// Builds the configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(vars, key);

        // --- Load Server and Database Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or("0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = var("DATABASE_URL")
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let database_max_connections = parse_or(vars, "DATABASE_MAX_CONNECTIONS", 5u32)?;

        let log_level_str = var("RUST_LOG").unwrap_or("INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = var("CORS_ORIGIN")
            .unwrap_or("http://localhost:3000")
            .to_string();

        // --- Load List Paging Settings ---
        let default_page_size = page_size_var(vars, "DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE.get())?;
        let max_page_size = page_size_var(vars, "MAX_PAGE_SIZE", 100)?;
        if default_page_size > max_page_size {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_PAGE_SIZE".to_string(),
                format!("must not exceed MAX_PAGE_SIZE ({})", max_page_size),
            ));
        }

        Ok(Self {
            bind_address,
            database_url,
            database_max_connections,
            log_level,
            cors_origin,
            default_page_size,
            max_page_size,
        })
    }

    /// Resolves a requested page size against the configured default and cap.
    pub fn page_size(&self, requested: Option<usize>) -> NonZeroUsize {
        requested
            .and_then(NonZeroUsize::new)
            .map(|size| size.min(self.max_page_size))
            .unwrap_or(self.default_page_size)
    }
}

fn lookup<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(String::as_str)
}

fn parse_or<T>(vars: &HashMap<String, String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(vars, key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

fn page_size_var(
    vars: &HashMap<String, String>,
    key: &str,
    default: usize,
) -> Result<NonZeroUsize, ConfigError> {
    let size = parse_or(vars, key, default)?;
    NonZeroUsize::new(size).ok_or_else(|| {
        ConfigError::InvalidValue(key.to_string(), "must be greater than zero".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_vars(&vars(&[("DATABASE_URL", "postgres://localhost/opion")])).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.default_page_size.get(), 25);
        assert_eq!(config.max_page_size.get(), 100);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = Config::from_vars(&vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref key) if key == "DATABASE_URL"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = Config::from_vars(&vars(&[
            ("DATABASE_URL", "postgres://localhost/opion"),
            ("DEFAULT_PAGE_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "DEFAULT_PAGE_SIZE"));
    }

    #[test]
    fn requested_page_size_is_capped() {
        let config = Config::from_vars(&vars(&[
            ("DATABASE_URL", "postgres://localhost/opion"),
            ("MAX_PAGE_SIZE", "50"),
        ]))
        .unwrap();
        assert_eq!(config.page_size(None).get(), 25);
        assert_eq!(config.page_size(Some(0)).get(), 25);
        assert_eq!(config.page_size(Some(10)).get(), 10);
        assert_eq!(config.page_size(Some(500)).get(), 50);
    }
}

//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `POI_*` environment variables (and config files or CLI
//! flags where OrthoConfig finds them). The database URL falls back to the
//! conventional `DATABASE_URL`.

use std::env;
use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Address the HTTP server binds to when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings problems that stop a binary from starting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Neither the explicit value nor `DATABASE_URL` was set.
    #[error("database URL missing: set --database-url, POI_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    /// A database URL was supplied but blank.
    #[error("{source_name} must not be empty")]
    EmptyDatabaseUrl { source_name: &'static str },
    /// The bind address did not parse.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Settings shared by the HTTP server and the import command.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POI")]
pub struct PoiSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections for the HTTP server.
    pub pool_max_size: Option<u32>,
    /// Socket address for the HTTP server.
    pub bind_addr: Option<String>,
}

impl PoiSettings {
    /// Resolve the database URL, falling back to `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when no usable URL is configured.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        resolve_database_url(
            self.database_url.clone(),
            env::var("DATABASE_URL").ok(),
        )
    }

    /// Parse the bind address, defaulting to [`DEFAULT_BIND_ADDR`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] for malformed values.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Pool configuration for the HTTP server.
    ///
    /// # Errors
    ///
    /// Propagates [`PoiSettings::database_url`] failures.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let config = PoolConfig::new(self.database_url()?);
        Ok(match self.pool_max_size {
            Some(max_size) => config.with_max_size(max_size),
            None => config,
        })
    }
}

/// Pick the explicit URL if given, else the fallback, rejecting blanks.
///
/// # Errors
///
/// Returns [`SettingsError`] when both are absent or the chosen one is blank.
///
/// # Examples
/// ```
/// use poi_backend::settings::resolve_database_url;
///
/// let url = resolve_database_url(None, Some("postgres://localhost/pois".to_owned()));
/// assert_eq!(url.as_deref(), Ok("postgres://localhost/pois"));
/// ```
pub fn resolve_database_url(
    explicit: Option<String>,
    fallback: Option<String>,
) -> Result<String, SettingsError> {
    let (value, source_name) = match (explicit, fallback) {
        (Some(value), _) => (value, "the configured database URL"),
        (None, Some(value)) => (value, "DATABASE_URL"),
        (None, None) => return Err(SettingsError::MissingDatabaseUrl),
    };
    if value.trim().is_empty() {
        return Err(SettingsError::EmptyDatabaseUrl { source_name });
    }
    Ok(value)
}

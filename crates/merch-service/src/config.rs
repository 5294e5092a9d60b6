//! Service configuration.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Longest accepted token lifetime: ten years.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct ServiceConfig {
    /// TCP port to listen on, all interfaces (default: 8080).
    pub server_port: u16,

    /// PostgreSQL DSN, or `memory://` for the in-process store.
    pub database_url: String,

    /// Base64 of the PEM RSA private key used to sign tokens.
    pub private_key: String,

    /// Base64 of the PEM RSA public key used to verify tokens.
    pub public_key: String,

    /// Connection pool size (default: 10).
    pub database_max_connections: u32,

    /// Token lifetime in hours (default: 24).
    pub token_ttl_hours: i64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ServiceConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let token_ttl_hours = parse_or(&lookup, "TOKEN_TTL_HOURS", defaults.token_ttl_hours)?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_HOURS",
                value: token_ttl_hours.to_string(),
            });
        }

        Ok(Self {
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            database_url: required("DATABASE_URL")?,
            private_key: required("PRIVATE_KEY")?,
            public_key: required("PUBLIC_KEY")?,
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            token_ttl_hours,
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
            request_timeout_seconds: parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            )?,
            shutdown_grace_seconds: parse_or(
                &lookup,
                "SHUTDOWN_GRACE_SECONDS",
                defaults.shutdown_grace_seconds,
            )?,
        })
    }

    /// Socket address to bind.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.server_port))
    }

    /// Whether the in-process store was requested instead of PostgreSQL.
    #[must_use]
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }

    /// Token lifetime, clamped to between one hour and ten years.
    #[must_use]
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS))
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("server_port", &self.server_port)
            .field("database_url", &"<redacted>")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key.len())
            .field("database_max_connections", &self.database_max_connections)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("cors_origins", &self.cors_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("shutdown_grace_seconds", &self.shutdown_grace_seconds)
            .finish()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            database_url: "memory://".into(),
            private_key: String::new(),
            public_key: String::new(),
            database_max_connections: 10,
            token_ttl_hours: 24,
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
            shutdown_grace_seconds: 5,
        }
    }
}

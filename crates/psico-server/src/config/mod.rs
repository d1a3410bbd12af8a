//! Server configuration.
//!
//! Loaded from an optional TOML file, then overridden by `PSICO_*`
//! environment variables, then validated. Every field has a default.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:3001"
//! cors_origins = ["http://localhost:5173"]
//!
//! [database]
//! path = "data/psicopedagogia.sqlite"
//!
//! [auth]
//! token_secret = "at-least-32-bytes-of-secret-material"
//! token_ttl_hours = 8
//!
//! [auth.bootstrap_admin]
//! usuario = "admin"
//! contrasenia = "cambiar-esta-clave"
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

mod loader;

pub use loader::*;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;
use psico_core::auth::DEFAULT_TOKEN_TTL_HOURS;
use psico_core::validation::MIN_PASSWORD_LEN;
use psico_core::HashParams;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::logging::parse_log_level;

/// Minimum token secret length, in bytes.
pub const MIN_TOKEN_SECRET_LEN: usize = 32;

/// Upper bound for `auth.token_ttl_hours` (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Allowed browser origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3001".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server.bind {:?}: {}", self.bind, e)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/psicopedagogia.sqlite"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. When absent a random per-process key is used.
    pub token_secret: Option<SecretString>,
    pub token_ttl_hours: i64,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let hash = HashParams::default();
        Self {
            token_secret: None,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            hash_memory_kib: hash.memory_kib,
            hash_iterations: hash.iterations,
            hash_parallelism: hash.parallelism,
            bootstrap_admin: None,
        }
    }
}

impl AuthConfig {
    pub fn hash_params(&self) -> HashParams {
        HashParams {
            memory_kib: self.hash_memory_kib,
            iterations: self.hash_iterations,
            parallelism: self.hash_parallelism,
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }
}

/// First admin account, created only while the therapist table is empty.
#[derive(Debug, Deserialize)]
pub struct BootstrapAdmin {
    pub usuario: String,
    pub contrasenia: SecretString,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Invalid(format!(
                "logging.format {other:?}: must be pretty or json"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Directory for daily-rotated JSON log files. Console only when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
        }
    }
}

impl AppConfig {
    /// Check cross-field constraints the TOML types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        for origin in &self.server.cors_origins {
            HeaderValue::from_str(origin).map_err(|_| {
                ConfigError::Invalid(format!("server.cors_origins: invalid origin {origin:?}"))
            })?;
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            return Err(ConfigError::Invalid(format!(
                "auth.token_ttl_hours must be between 1 and {MAX_TOKEN_TTL_HOURS}"
            )));
        }
        if let Some(secret) = &self.auth.token_secret {
            if secret.expose_secret().len() < MIN_TOKEN_SECRET_LEN {
                return Err(ConfigError::Invalid(format!(
                    "auth.token_secret must be at least {MIN_TOKEN_SECRET_LEN} bytes"
                )));
            }
        }
        self.auth
            .hash_params()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("auth.hash_*: {e}")))?;

        if let Some(admin) = &self.auth.bootstrap_admin {
            if admin.usuario.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "auth.bootstrap_admin.usuario must not be empty".into(),
                ));
            }
            if admin.contrasenia.expose_secret().trim().chars().count() < MIN_PASSWORD_LEN {
                return Err(ConfigError::Invalid(format!(
                    "auth.bootstrap_admin.contrasenia must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
        }

        parse_log_level(&self.logging.level)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }
}

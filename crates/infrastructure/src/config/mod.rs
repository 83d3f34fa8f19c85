//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings and deployment mode
//! - `security`: API key and rate limiting
//! - `store`: Document store backend selection
//!
//! Telemetry settings live next to the telemetry setup in
//! [`crate::telemetry`].

mod security;
mod server;
mod store;

use std::{fmt, str::FromStr};

use config::{Config, ConfigBuilder, Map, builder::DefaultState};
use secrecy::ExposeSecret;
use serde::{Deserialize, Deserializer, de};
use thiserror::Error;
use tracing::debug;

pub use security::SecurityConfig;
pub use server::{DeploymentMode, LogFormat, ServerConfig};
pub use store::{FirestoreAppConfig, StoreBackend, StoreConfig};

use crate::telemetry::TelemetryConfig;

/// Prefix for nested environment overrides, e.g. `QUOTES_SERVER__PORT`
pub const ENV_PREFIX: &str = "QUOTES";

/// Dotenv files read before the environment is consulted
///
/// `secret.env` is also looked up one level up, where it sits next to the
/// deployment's function sources.
const DOTENV_FILES: [&str; 3] = [".env", "secret.env", "../secret.env"];

/// Flat variables used by existing deployments and the keys they override
const LEGACY_VARIABLES: [(&str, &str); 4] = [
    ("KEY", "security.api_key"),
    ("PORT", "server.port"),
    ("PROJECT_ID", "store.firestore.project_id"),
    ("API_KEY", "store.firestore.api_key"),
];

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Deserialize a list given either as an array or as one comma-separated
/// string, as environment variables provide it
pub(crate) fn comma_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Joined(String),
    }

    let items = match Raw::deserialize(deserializer)? {
        Raw::List(items) => items,
        Raw::Joined(joined) => joined.split(',').map(str::to_owned).collect(),
    };

    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse()
                .map_err(|e| de::Error::custom(format!("invalid list entry {item:?}: {e}")))
        })
        .collect()
}

/// Startup configuration problems
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("No API key configured (set KEY or QUOTES_SECURITY__API_KEY)")]
    MissingApiKey,

    #[error("Firestore backend selected but no project id configured (set PROJECT_ID)")]
    MissingProjectId,

    #[error("Rate limit must allow at least one request per non-empty window")]
    InvalidRateLimit,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from defaults, `config.toml`, dotenv files and the
    /// environment (later sources win)
    pub fn load() -> Result<Self, config::ConfigError> {
        for file in DOTENV_FILES {
            if let Ok(path) = dotenvy::from_filename(file) {
                debug!(path = %path.display(), "Loaded dotenv file");
            }
        }

        let builder =
            Self::defaults()?.add_source(config::File::with_name("config").required(false));

        Self::resolve(builder, Self::environment(None), |name| {
            std::env::var(name).ok()
        })
    }

    /// Nested `QUOTES_*` overrides, read from `vars` instead of the process
    /// environment when given
    ///
    /// Values stay strings; serde converts them per field, so secrets such
    /// as `007123` or `TRUE` are kept verbatim.
    fn environment(vars: Option<Map<String, String>>) -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(vars)
    }

    /// Layer the environment and legacy variables over `builder` and
    /// deserialize the result
    fn resolve(
        builder: ConfigBuilder<DefaultState>,
        environment: config::Environment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, config::ConfigError> {
        Self::with_legacy_overrides(builder.add_source(environment), lookup)?
            .build()?
            .try_deserialize()
    }

    /// Builder pre-populated with defaults
    fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.mode", "server")?
            .set_default("store.backend", "firestore")
    }

    /// Apply the flat legacy variables on top of everything else
    fn with_legacy_overrides(
        mut builder: ConfigBuilder<DefaultState>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        for (variable, key) in LEGACY_VARIABLES {
            let value = lookup(variable).filter(|v| !v.is_empty());
            builder = builder.set_override_option(key, value)?;
        }
        Ok(builder)
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let has_key = self
            .security
            .api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty());
        if !has_key {
            return Err(ConfigValidationError::MissingApiKey);
        }

        if self.store.backend == StoreBackend::Firestore
            && self.store.firestore.project_id.is_empty()
        {
            return Err(ConfigValidationError::MissingProjectId);
        }

        if self.security.rate_limit_enabled
            && (self.security.rate_limit_requests == 0 || self.security.rate_limit_window_secs == 0)
        {
            return Err(ConfigValidationError::InvalidRateLimit);
        }

        Ok(())
    }
}

//! Document store configuration.

use integration_firestore::FirestoreConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Which store implementation backs the ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Cloud Firestore over REST
    #[default]
    Firestore,
    /// Process-local maps, lost on restart
    Memory,
}

/// Document store configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub firestore: FirestoreAppConfig,
}

/// Firestore connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreAppConfig {
    /// REST base URL; point at the emulator for local runs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Google Cloud project id
    #[serde(default)]
    pub project_id: String,

    /// Database id
    #[serde(default = "default_database")]
    pub database: String,

    /// Firebase web API key
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// OAuth access token
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    FirestoreConfig::default().base_url
}

fn default_database() -> String {
    FirestoreConfig::default().database
}

fn default_timeout() -> u64 {
    FirestoreConfig::default().timeout_secs
}

impl Default for FirestoreAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            project_id: String::new(),
            database: default_database(),
            api_key: None,
            access_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl FirestoreAppConfig {
    /// Client settings with secrets exposed for the HTTP layer
    pub fn to_client_config(&self) -> FirestoreConfig {
        FirestoreConfig {
            base_url: self.base_url.clone(),
            project_id: self.project_id.clone(),
            database: self.database.clone(),
            api_key: self.api_key.as_ref().map(|k| k.expose_secret().to_owned()),
            access_token: self
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().to_owned()),
            timeout_secs: self.timeout_secs,
            ..FirestoreConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_firestore() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, StoreBackend::Firestore);
        assert_eq!(config.firestore.database, "(default)");
        assert_eq!(
            config.firestore.base_url,
            "https://firestore.googleapis.com/v1"
        );
    }

    #[test]
    fn client_config_carries_credentials() {
        let config: FirestoreAppConfig = serde_json::from_str(
            r#"{"project_id": "quotes", "api_key": "web-key", "base_url": "http://localhost:8080/v1"}"#,
        )
        .unwrap();

        let client = config.to_client_config();

        assert_eq!(client.project_id, "quotes");
        assert_eq!(client.api_key.as_deref(), Some("web-key"));
        assert!(client.access_token.is_none());
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn backend_deserializes_lowercase() {
        let config: StoreConfig = serde_json::from_str(r#"{"backend": "memory"}"#).unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
    }
}

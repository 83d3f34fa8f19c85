//! Security configuration: API key and rate limiting.

use std::net::IpAddr;

use secrecy::SecretString;
use serde::Deserialize;

use super::{comma_list, default_true};

/// Security configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret expected in the `x-api-key` header
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Trusted proxy IP addresses for X-Forwarded-For header validation
    ///
    /// Only IPs in this list are trusted to set X-Forwarded-For headers.
    /// If empty, the direct connection IP is always used.
    #[serde(default, deserialize_with = "comma_list")]
    pub trusted_proxies: Vec<IpAddr>,

    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub rate_limit_enabled: bool,

    /// Requests allowed per client per window
    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: u32,

    /// Window length in seconds
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
}

const fn default_rate_limit_requests() -> u32 {
    60
}

const fn default_rate_limit_window() -> u64 {
    60
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            trusted_proxies: Vec::new(),
            rate_limit_enabled: true,
            rate_limit_requests: default_rate_limit_requests(),
            rate_limit_window_secs: default_rate_limit_window(),
        }
    }
}

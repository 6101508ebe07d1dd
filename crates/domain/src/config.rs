//! Configuration structures
//!
//! Only `api.base_url` is required; every other field has a default so a
//! minimal config file is a single line.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_KEYCHAIN_SERVICE, DEFAULT_LOGIN_PATH, DEFAULT_REDIRECT_DELAY_MS, DEFAULT_REFRESH_PATH,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TRANSPORT_ATTEMPTS,
};
use crate::impl_domain_status_conversions;

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig::new(base_url),
            session: SessionConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where and how requests are sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the API (e.g., "https://blog.example.com/api")
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total transport attempts for requests that never got a response.
    /// HTTP error statuses are never retried at this layer.
    #[serde(default = "default_transport_attempts")]
    pub transport_attempts: usize,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ApiConfig {
    /// Defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            transport_attempts: DEFAULT_TRANSPORT_ATTEMPTS,
            user_agent: None,
        }
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How concurrent refresh attempts are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// One refresh in flight at a time; late arrivals reuse its result.
    #[default]
    Coalesce,
    /// Every failing request performs its own refresh call.
    PerRequest,
}

impl_domain_status_conversions!(RefreshPolicy {
    Coalesce => "coalesce",
    PerRequest => "per_request",
});

/// Session recovery behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,
}

impl SessionConfig {
    /// Delay before the session-expired event fires
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_path: default_refresh_path(),
            login_path: default_login_path(),
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

/// Credential store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Keychain,
}

impl_domain_status_conversions!(StorageBackend {
    Memory => "memory",
    File => "file",
    Keychain => "keychain",
});

/// Credential persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// File path for the `file` backend
    #[serde(default)]
    pub path: Option<String>,
    /// Service name for the `keychain` backend
    #[serde(default = "default_keychain_service")]
    pub service_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            service_name: default_keychain_service(),
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_transport_attempts() -> usize {
    DEFAULT_TRANSPORT_ATTEMPTS
}

fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_redirect_delay_ms() -> u64 {
    DEFAULT_REDIRECT_DELAY_MS
}

fn default_keychain_service() -> String {
    DEFAULT_KEYCHAIN_SERVICE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

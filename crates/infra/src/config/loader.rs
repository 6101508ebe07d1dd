//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `INKPOST_API_BASE_URL` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `INKPOST_API_BASE_URL`: API base URL (required)
//! - `INKPOST_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `INKPOST_API_TRANSPORT_ATTEMPTS`: Attempts for connection failures
//! - `INKPOST_REFRESH_PATH`: Credential refresh endpoint
//! - `INKPOST_LOGIN_PATH`: Redirect target when the session expires
//! - `INKPOST_REDIRECT_DELAY_MS`: Delay before the redirect is signalled
//! - `INKPOST_REFRESH_POLICY`: `coalesce` or `per_request`
//! - `INKPOST_STORAGE_BACKEND`: `memory`, `file` or `keychain`
//! - `INKPOST_STORAGE_PATH`: Credential file for the `file` backend
//! - `INKPOST_LOG_LEVEL`: Default tracing filter
//! - `INKPOST_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./inkpost.json` or `./inkpost.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use inkpost_domain::{ClientConfig, InkpostError, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the base URL
/// variable is missing or any value is invalid, falls back to loading from
/// a config file.
///
/// # Errors
/// Returns `InkpostError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `INKPOST_API_BASE_URL` is required; unset optional variables keep
/// their defaults.
///
/// # Errors
/// Returns `InkpostError::Config` if the base URL is missing or a value
/// does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::with_base_url(env_var("INKPOST_API_BASE_URL")?);

    if let Some(timeout) = env_parse("INKPOST_API_TIMEOUT_SECS")? {
        config.api.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parse("INKPOST_API_TRANSPORT_ATTEMPTS")? {
        config.api.transport_attempts = attempts;
    }

    if let Ok(path) = std::env::var("INKPOST_REFRESH_PATH") {
        config.session.refresh_path = path;
    }
    if let Ok(path) = std::env::var("INKPOST_LOGIN_PATH") {
        config.session.login_path = path;
    }
    if let Some(delay) = env_parse("INKPOST_REDIRECT_DELAY_MS")? {
        config.session.redirect_delay_ms = delay;
    }
    if let Some(policy) = env_parse("INKPOST_REFRESH_POLICY")? {
        config.session.refresh_policy = policy;
    }

    if let Some(backend) = env_parse("INKPOST_STORAGE_BACKEND")? {
        config.storage.backend = backend;
    }
    config.storage.path = std::env::var("INKPOST_STORAGE_PATH").ok();

    if let Ok(level) = std::env::var("INKPOST_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("INKPOST_LOG_JSON", false);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `InkpostError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(InkpostError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            InkpostError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| InkpostError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, format chosen by extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| InkpostError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| InkpostError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(InkpostError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 8] = [
        "config.json",
        "config.toml",
        "inkpost.json",
        "inkpost.toml",
        "../config.json",
        "../config.toml",
        "../../config.json",
        "../../config.toml",
    ];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| InkpostError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable; unset yields `None`.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| InkpostError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

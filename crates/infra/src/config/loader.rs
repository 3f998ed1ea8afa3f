//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Load a `.env` file from the working directory when one exists
//! 2. Build the configuration from environment variables
//! 3. If `WASTEWISE_API_BASE_URL` is not set, fall back to a config file
//! 4. Validate the result
//!
//! Once the base URL is set the environment is authoritative: a malformed
//! variable is an error, never a silent switch to a file.
//!
//! ## Environment Variables
//! - `WASTEWISE_API_BASE_URL`: backend base URL (required for env loading)
//! - `WASTEWISE_API_TIMEOUT_SECS`: request timeout in seconds
//! - `WASTEWISE_CLASSIFY_PATH`: classification route (`/classify`, `/ai/predict`)
//! - `WASTEWISE_STORAGE_BACKEND`: `keychain`, `file` or `memory`
//! - `WASTEWISE_STORAGE_PATH`: session file for the file backend
//! - `WASTEWISE_ENVIRONMENT`: `development`, `staging` or `production`
//! - `WASTEWISE_GATEWAY_KEY_ID`: public key of the real checkout gateway
//! - `WASTEWISE_PAYMENT_SIMULATION`: whether simulated payments are allowed
//! - `WASTEWISE_SIMULATION_FAILURE_RATE`: decline probability in `[0, 1]`
//!
//! ## File Locations
//! `config.{json,toml}` then `wastewise.{json,toml}`, first in the working
//! directory and its parents (two levels), then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};
use wastewise_domain::{ClientConfig, Result, WasteWiseError};

const BASE_URL_VAR: &str = "WASTEWISE_API_BASE_URL";

/// Load configuration with automatic fallback
///
/// # Errors
/// Returns `WasteWiseError::Config` if the environment is selected but
/// malformed, or if no valid config file is found.
pub fn load() -> Result<ClientConfig> {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => debug!(error = %e, "Ignoring unreadable .env file"),
    }

    if env_opt(BASE_URL_VAR).is_none() {
        debug!("{BASE_URL_VAR} not set, loading from file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from `WASTEWISE_*` variables
///
/// Only the base URL is required; every other setting keeps its default
/// when unset.
///
/// # Errors
/// Returns `WasteWiseError::Config` if the base URL is missing, a value
/// cannot be parsed, or validation fails.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::default();
    config.api.base_url = env_var(BASE_URL_VAR)?;

    if let Some(timeout) = env_parse::<u64>("WASTEWISE_API_TIMEOUT_SECS")? {
        config.api.timeout_secs = timeout;
    }
    if let Some(path) = env_opt("WASTEWISE_CLASSIFY_PATH") {
        config.api.classify_path = path;
    }
    if let Some(backend) = env_parse("WASTEWISE_STORAGE_BACKEND")? {
        config.storage.backend = backend;
    }
    if let Some(path) = env_opt("WASTEWISE_STORAGE_PATH") {
        config.storage.path = Some(PathBuf::from(path));
    }
    if let Some(environment) = env_parse("WASTEWISE_ENVIRONMENT")? {
        config.payments.environment = environment;
    }
    config.payments.gateway_key_id = env_opt("WASTEWISE_GATEWAY_KEY_ID");
    config.payments.simulation.enabled =
        env_bool("WASTEWISE_PAYMENT_SIMULATION", config.payments.simulation.enabled);
    if let Some(rate) = env_parse::<f64>("WASTEWISE_SIMULATION_FAILURE_RATE")? {
        config.payments.simulation.failure_rate = rate;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `WasteWiseError::Config` if the file is missing, unreadable,
/// malformed or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WasteWiseError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WasteWiseError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WasteWiseError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WasteWiseError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WasteWiseError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WasteWiseError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "wastewise.json", "wastewise.toml"];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }
    if let Ok(exe) = std::env::current_exe() {
        roots.extend(exe.parent().map(Path::to_path_buf));
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        WasteWiseError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Set and non-blank
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| WasteWiseError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    env_opt(key)
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

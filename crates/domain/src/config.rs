//! Client configuration structures
//!
//! Loaded by `wastewise_infra::config` from environment variables or a
//! JSON/TOML file. Every section has defaults so a file only needs to name
//! what it overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CLASSIFY_PATH, DEFAULT_CURRENCY, DEFAULT_KEYCHAIN_SERVICE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT, SIMULATED_GATEWAY_DELAY_MS,
    SIMULATED_GATEWAY_FAILURE_RATE,
};
use crate::{Result, WasteWiseError};

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub payments: PaymentConfig,
}

impl ClientConfig {
    /// Check cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    /// Returns `WasteWiseError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(WasteWiseError::Config("api.base_url must not be empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(WasteWiseError::Config("api.timeout_secs must be positive".to_string()));
        }
        if !self.api.classify_path.starts_with('/') {
            return Err(WasteWiseError::Config(format!(
                "api.classify_path must start with '/': {}",
                self.api.classify_path
            )));
        }
        let rate = self.payments.simulation.failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(WasteWiseError::Config(format!(
                "payments.simulation.failure_rate must be within [0, 1], got {rate}"
            )));
        }
        if self.storage.backend == StorageBackend::File && self.storage.path.is_none() {
            return Err(WasteWiseError::Config(
                "storage.path is required for the file backend".to_string(),
            ));
        }
        Ok(())
    }
}

/// Remote backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Classification route; `/classify` by default, `/ai/predict` on
    /// deployments that only expose the model endpoint.
    pub classify_path: String,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            classify_path: DEFAULT_CLASSIFY_PATH.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Where the session (tokens + cached profile) is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Keychain,
    File,
    Memory,
}

crate::impl_domain_status_conversions!(StorageBackend {
    Keychain => "keychain",
    File => "file",
    Memory => "memory",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub service_name: String,
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            service_name: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            path: None,
        }
    }
}

/// Deployment environment; simulation is never allowed in production
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

crate::impl_domain_status_conversions!(Environment {
    Development => "development",
    Staging => "staging",
    Production => "production",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub environment: Environment,
    /// Public key id of the real checkout gateway. When set, the simulated
    /// gateway is never selected.
    pub gateway_key_id: Option<String>,
    pub currency: String,
    pub simulation: SimulationConfig,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            gateway_key_id: None,
            currency: DEFAULT_CURRENCY.to_string(),
            simulation: SimulationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub enabled: bool,
    pub delay_ms: u64,
    pub failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: SIMULATED_GATEWAY_DELAY_MS,
            failure_rate: SIMULATED_GATEWAY_FAILURE_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.classify_path, "/classify");
        assert_eq!(config.storage.backend, StorageBackend::Keychain);
        assert_eq!(config.payments.currency, "INR");
        assert_eq!(config.payments.simulation.delay_ms, 2000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api": {"base_url": "https://api.example.org"}}"#).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.org");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.payments.environment, Environment::Development);
    }

    #[test]
    fn test_validate_rejects_bad_failure_rate() {
        let mut config = ClientConfig::default();
        config.payments.simulation.failure_rate = 1.5;
        assert!(matches!(config.validate(), Err(WasteWiseError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_empty_url() {
        let mut config = ClientConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_backend_requires_path() {
        let mut config = ClientConfig::default();
        config.storage.backend = StorageBackend::File;
        assert!(config.validate().is_err());

        config.storage.path = Some(PathBuf::from("/tmp/session.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_parses_case_insensitively() {
        assert_eq!("PRODUCTION".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
    }
}

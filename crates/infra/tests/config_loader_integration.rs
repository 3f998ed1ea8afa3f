//! Configuration loading from the process environment and from files

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tempfile::Builder;
use wastewise_domain::{Environment, StorageBackend, WasteWiseError};
use wastewise_infra::config::{load, load_from_env, load_from_file};

/// Environment variables are process-wide; tests touching them run one at a time
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const VARS: [&str; 9] = [
    "WASTEWISE_API_BASE_URL",
    "WASTEWISE_API_TIMEOUT_SECS",
    "WASTEWISE_CLASSIFY_PATH",
    "WASTEWISE_STORAGE_BACKEND",
    "WASTEWISE_STORAGE_PATH",
    "WASTEWISE_ENVIRONMENT",
    "WASTEWISE_GATEWAY_KEY_ID",
    "WASTEWISE_PAYMENT_SIMULATION",
    "WASTEWISE_SIMULATION_FAILURE_RATE",
];

fn with_env<R>(vars: &[(&str, &str)], test: impl FnOnce() -> R) -> R {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for key in VARS {
        std::env::remove_var(key);
    }
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    let result = test();
    for key in VARS {
        std::env::remove_var(key);
    }
    result
}

#[test]
fn env_overrides_defaults() {
    let config = with_env(
        &[
            ("WASTEWISE_API_BASE_URL", "https://api.wastewise.in/api"),
            ("WASTEWISE_API_TIMEOUT_SECS", " 45 "),
            ("WASTEWISE_CLASSIFY_PATH", "/ai/predict"),
            ("WASTEWISE_STORAGE_BACKEND", "memory"),
            ("WASTEWISE_ENVIRONMENT", "staging"),
            ("WASTEWISE_PAYMENT_SIMULATION", "off"),
            ("WASTEWISE_SIMULATION_FAILURE_RATE", "0.25"),
        ],
        load_from_env,
    )
    .unwrap();

    assert_eq!(config.api.base_url, "https://api.wastewise.in/api");
    assert_eq!(config.api.timeout_secs, 45);
    assert_eq!(config.api.classify_path, "/ai/predict");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.payments.environment, Environment::Staging);
    assert!(!config.payments.simulation.enabled);
    assert!((config.payments.simulation.failure_rate - 0.25).abs() < f64::EPSILON);
    assert_eq!(config.payments.gateway_key_id, None);
}

#[test]
fn env_requires_base_url() {
    let err = with_env(&[("WASTEWISE_API_TIMEOUT_SECS", "10")], load_from_env).unwrap_err();
    assert!(matches!(err, WasteWiseError::Config(message) if message.contains("BASE_URL")));
}

#[test]
fn env_rejects_unparseable_numbers() {
    let err = with_env(
        &[
            ("WASTEWISE_API_BASE_URL", "http://localhost:5000/api"),
            ("WASTEWISE_API_TIMEOUT_SECS", "soon"),
        ],
        load_from_env,
    )
    .unwrap_err();
    assert!(matches!(err, WasteWiseError::Config(message) if message.contains("TIMEOUT_SECS")));
}

#[test]
fn env_file_backend_needs_a_path() {
    let result = with_env(
        &[
            ("WASTEWISE_API_BASE_URL", "http://localhost:5000/api"),
            ("WASTEWISE_STORAGE_BACKEND", "file"),
        ],
        load_from_env,
    );
    assert!(matches!(result, Err(WasteWiseError::Config(_))));

    let config = with_env(
        &[
            ("WASTEWISE_API_BASE_URL", "http://localhost:5000/api"),
            ("WASTEWISE_STORAGE_BACKEND", "file"),
            ("WASTEWISE_STORAGE_PATH", "/tmp/wastewise/session.json"),
        ],
        load_from_env,
    )
    .unwrap();
    assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/wastewise/session.json")));
}

#[test]
fn load_prefers_environment() {
    let config = with_env(&[("WASTEWISE_API_BASE_URL", "https://env.wastewise.in/api")], load)
        .unwrap();
    assert_eq!(config.api.base_url, "https://env.wastewise.in/api");
}

#[test]
fn malformed_environment_is_not_replaced_by_a_file() {
    let err = with_env(
        &[
            ("WASTEWISE_API_BASE_URL", "https://env.wastewise.in/api"),
            ("WASTEWISE_API_TIMEOUT_SECS", "soon"),
        ],
        load,
    )
    .unwrap_err();

    assert!(
        matches!(&err, WasteWiseError::Config(message) if message.contains("TIMEOUT_SECS")),
        "unexpected error: {err:?}"
    );
}

#[test]
fn json_file_is_loaded_with_defaults() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"api": {{"base_url": "https://file.wastewise.in/api"}},
            "payments": {{"environment": "production", "gateway_key_id": "rzp_live_abc"}}}}"#
    )
    .unwrap();

    let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

    assert_eq!(config.api.base_url, "https://file.wastewise.in/api");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.payments.environment, Environment::Production);
    assert_eq!(config.payments.gateway_key_id.as_deref(), Some("rzp_live_abc"));
}

#[test]
fn malformed_file_is_a_config_error() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    write!(file, "[api\nbase_url = ").unwrap();

    let err = load_from_file(Some(file.path().to_path_buf())).unwrap_err();

    assert!(matches!(err, WasteWiseError::Config(message) if message.contains("TOML")));
}

//! API-specific error types
//!
//! Provides error classification for backend operations. Messages carry the
//! backend's own wording when it supplies one.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use wastewise_common::auth::TokenStoreError;
use wastewise_domain::WasteWiseError;

/// Categories of API errors for callers deciding what to show or retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Session expired or missing - sign in again
    Authentication,
    /// Rate limiting errors (429) - retry later
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Rejected request (4xx, validation, contract mismatch) - non-retryable
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Local configuration or storage problem - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The session has been cleared; the user must sign in again
    #[error("Authentication required: {0}")]
    Auth(String),

    #[error("{message}")]
    Client { status: u16, message: String },

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Rejected before anything was sent
    #[error("{0}")]
    Validation(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Client { .. } | Self::Validation(_) | Self::Decode(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) | Self::Storage(_) => ApiErrorCategory::Config,
        }
    }

    /// Whether repeating the same call later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    /// HTTP status of a backend rejection, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Auth(_) => Some(StatusCode::UNAUTHORIZED.as_u16()),
            Self::RateLimit(_) => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            _ => None,
        }
    }

    /// Map a non-success status and its extracted message
    pub fn from_status(status: StatusCode, message: String) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Self::Auth(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimit(message)
        } else if status.is_server_error() {
            Self::Server { status: status.as_u16(), message }
        } else {
            Self::Client { status: status.as_u16(), message }
        }
    }

    /// Map a transport failure; `timeout` is the limit the request ran under
    pub fn transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_builder() {
            Self::Config(format!("Invalid request: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Pick the user-facing message from an error body
///
/// Precedence: `message`, then `error`, then `fallback`.
pub fn error_message(body: &Value, fallback: &str) -> String {
    ["message", "error"]
        .iter()
        .find_map(|key| {
            body.get(key).and_then(Value::as_str).filter(|message| !message.trim().is_empty())
        })
        .map_or_else(|| fallback.to_string(), str::to_string)
}

impl From<TokenStoreError> for ApiError {
    fn from(err: TokenStoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<WasteWiseError> for ApiError {
    fn from(err: WasteWiseError) -> Self {
        match err {
            WasteWiseError::Validation(message) => Self::Validation(message),
            WasteWiseError::Serialization(message) => Self::Decode(message),
            WasteWiseError::Config(message) => Self::Config(message),
            WasteWiseError::Storage(message) => Self::Storage(message),
            WasteWiseError::NotFound(message) => {
                Self::Client { status: StatusCode::NOT_FOUND.as_u16(), message }
            }
            WasteWiseError::Internal(message) => Self::Config(message),
        }
    }
}

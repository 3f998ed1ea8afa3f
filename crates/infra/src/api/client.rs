//! WasteWise backend client
//!
//! [`WasteWiseClient`] owns the token store and the request executor. Domain
//! endpoints live in [`super::endpoints`] as `impl WasteWiseClient` blocks and
//! share the response helpers defined here.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use wastewise_common::auth::{SessionStorage, TokenStore};
use wastewise_domain::{ApiConfig, ClientConfig};

use super::errors::{error_message, ApiError};
use super::executor::RequestExecutor;
use super::request::ApiRequest;
use crate::http::HttpClient;

/// Client for the WasteWise REST backend
///
/// Built once and injected; there is no process-wide instance.
pub struct WasteWiseClient {
    executor: RequestExecutor,
    tokens: Arc<TokenStore>,
    config: ApiConfig,
}

impl WasteWiseClient {
    /// Create a client over `storage`
    ///
    /// # Errors
    /// Returns `ApiError::Config` for an invalid configuration or when the
    /// HTTP client cannot be built.
    pub fn new(config: &ClientConfig, storage: Arc<dyn SessionStorage>) -> Result<Self, ApiError> {
        config.validate()?;

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .user_agent(config.api.user_agent.clone())
            .build()?;
        let tokens = Arc::new(TokenStore::new(storage));
        let executor = RequestExecutor::new(http, &config.api.base_url, Arc::clone(&tokens))?;

        debug!(base_url = executor.base_url(), "WasteWise client created");
        Ok(Self { executor, tokens, config: config.api.clone() })
    }

    pub fn builder() -> WasteWiseClientBuilder {
        WasteWiseClientBuilder::default()
    }

    /// Restore a persisted session; returns whether one was found
    pub async fn initialize(&self) -> bool {
        let restored = self.tokens.initialize().await;
        info!(restored, "Session initialised");
        restored
    }

    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    /// Execute `request` and return its JSON body
    pub(crate) async fn call(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        let response = self.executor.execute(request).await?;
        read_json(response, fallback).await
    }

    /// Execute `request` and decode the whole body as `T`
    pub(crate) async fn call_as<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> Result<T, ApiError> {
        decode(self.call(request, fallback).await?)
    }

    /// Execute `request` and decode the object under `key`
    pub(crate) async fn call_field<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        key: &str,
        fallback: &str,
    ) -> Result<T, ApiError> {
        take_field(self.call(request, fallback).await?, key)
    }
}

/// Interpret a backend response
///
/// Non-2xx statuses and `success: false` bodies become errors carrying the
/// backend's message. An empty 2xx body decodes as `null`.
pub(crate) async fn read_json(response: Response, fallback: &str) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("Failed to read response body: {e}")))?;

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => Value::Null,
            Err(e) => return Err(ApiError::Decode(format!("Response is not JSON: {e}"))),
        }
    };

    if !status.is_success() {
        return Err(ApiError::from_status(status, error_message(&body, fallback)));
    }
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::Client {
            status: status.as_u16(),
            message: error_message(&body, fallback),
        });
    }
    Ok(body)
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn take_field<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T, ApiError> {
    let value = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::Decode(format!("Missing '{key}' in response")))?;
    decode(value)
}

/// Builder for [`WasteWiseClient`]
#[derive(Default)]
pub struct WasteWiseClientBuilder {
    config: ClientConfig,
    storage: Option<Arc<dyn SessionStorage>>,
}

impl WasteWiseClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.api.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.api.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn classify_path(mut self, path: impl Into<String>) -> Self {
        self.config.api.classify_path = path.into();
        self
    }

    pub fn storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// # Errors
    /// Returns `ApiError::Config` when no storage was provided or the
    /// configuration is invalid.
    pub fn build(self) -> Result<WasteWiseClient, ApiError> {
        let storage =
            self.storage.ok_or_else(|| ApiError::Config("Session storage not set".to_string()))?;
        WasteWiseClient::new(&self.config, storage)
    }
}

//! Request executor with one-shot token refresh
//!
//! Every backend call goes through [`RequestExecutor::execute`], which
//! attaches the bearer token and, on a 401 for an authenticated request,
//! refreshes the session once and retries the call exactly once.
//!
//! Refreshes are coalesced behind the refresh latch: the first caller to take
//! it refreshes, later callers see that the access token has already changed
//! and retry with it. N concurrent 401s therefore produce one
//! `POST /auth/refresh`. A retry that is refused again ends the session, so
//! every `ApiError::Auth` leaves the client signed out.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;
use wastewise_common::auth::TokenStore;
use wastewise_domain::AuthTokens;

use super::errors::{error_message, ApiError};
use super::request::{ApiRequest, RequestBody};
use crate::http::HttpClient;

const REFRESH_PATH: &str = "/auth/refresh";
const SESSION_EXPIRED: &str = "Session expired. Please sign in again.";

pub struct RequestExecutor {
    http: HttpClient,
    base_url: String,
    tokens: Arc<TokenStore>,
    refresh_latch: Mutex<()>,
}

impl RequestExecutor {
    /// # Errors
    /// Returns `ApiError::Config` if `base_url` is not an absolute http(s) URL.
    pub fn new(
        http: HttpClient,
        base_url: &str,
        tokens: Arc<TokenStore>,
    ) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            let scheme = parsed.scheme();
            return Err(ApiError::Config(format!("Unsupported base URL scheme: {scheme}")));
        }

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            refresh_latch: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Execute a request, refreshing the session at most once on 401
    ///
    /// Non-success responses other than a recoverable 401 are returned as-is
    /// for the endpoint to interpret.
    ///
    /// # Errors
    /// - `ApiError::Network` / `ApiError::Timeout` on transport failure
    /// - `ApiError::Auth` when the session could not be refreshed; the session
    ///   has been cleared
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let token = if request.authenticated { self.tokens.access_token().await } else { None };
        let response = self.send(&request, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        // Unauthenticated calls (login, registration) report their own 401s.
        let Some(rejected) = token else {
            return Ok(response);
        };

        let message = Self::read_error(response, SESSION_EXPIRED).await;
        let fresh = self.refresh_after(&rejected, message).await?;

        debug!("Retrying request with refreshed token");
        let response = self.send(&request, Some(&fresh)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.expire(&fresh).await;
        }
        Ok(response)
    }

    /// Clear a session whose freshly refreshed token was still refused,
    /// unless it has been replaced in the meantime
    async fn expire(&self, refused: &str) {
        let _latch = self.refresh_latch.lock().await;
        if self.tokens.access_token().await.as_deref() == Some(refused) {
            warn!("Refreshed access token rejected, clearing session");
            self.tokens.clear_tokens().await;
        }
    }

    /// Obtain a usable access token after `rejected` was refused
    async fn refresh_after(&self, rejected: &str, message: String) -> Result<String, ApiError> {
        let _latch = self.refresh_latch.lock().await;

        match self.tokens.access_token().await {
            Some(current) if current != rejected => {
                debug!("Session already refreshed by a concurrent request");
                return Ok(current);
            }
            Some(_) => {}
            None => return Err(ApiError::Auth(message)),
        }

        let Some(refresh_token) = self.tokens.refresh_token().await else {
            warn!("Access token rejected and no refresh token held, clearing session");
            self.tokens.clear_tokens().await;
            return Err(ApiError::Auth(message));
        };

        match self.refresh(&refresh_token).await {
            Ok(access_token) => Ok(access_token),
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                self.tokens.clear_tokens().await;
                Err(ApiError::Auth(message))
            }
        }
    }

    /// `POST /auth/refresh`; stores the new pair on success
    async fn refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        // The refresh route authenticates with the refresh token itself.
        let request = ApiRequest::post(REFRESH_PATH)
            .json_value(json!({ "refresh_token": refresh_token }))
            .unauthenticated();
        let response = self.send(&request, Some(refresh_token)).await?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::read_error(response, SESSION_EXPIRED).await;
            return Err(ApiError::from_status(status, message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("Invalid refresh response: {e}")))?;
        let payload = body.get("tokens").unwrap_or(&body).clone();
        let tokens: AuthTokens = serde_json::from_value(payload)
            .map_err(|e| ApiError::Decode(format!("Invalid refresh response: {e}")))?;

        // Keep the refresh token we used when the backend does not rotate it.
        let next_refresh = tokens.refresh_token.as_deref().unwrap_or(refresh_token);
        self.tokens.set_tokens(&tokens.access_token, Some(next_refresh)).await?;
        info!(rotated = tokens.refresh_token.is_some(), "Access token refreshed");
        Ok(tokens.access_token)
    }

    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if !request.body.is_multipart() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::Auth("Stored access token is not a valid header".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        for (name, value) in &request.headers {
            headers.insert(name.clone(), value.clone());
        }
        if request.body.is_multipart() {
            // reqwest writes the boundary into its own Content-Type.
            headers.remove(CONTENT_TYPE);
        }
        builder = builder.headers(headers);

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(fields) => builder.multipart(RequestBody::to_form(fields)?),
        };

        let timeout = request.timeout.unwrap_or_else(|| self.http.timeout());
        self.http.send_with_timeout(builder, timeout).await
    }

    /// Consume an error response and extract its message
    pub(crate) async fn read_error(response: Response, fallback: &str) -> String {
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        error_message(&body, fallback)
    }
}

#[cfg(test)]
mod tests {
    use wastewise_common::testing::MockSessionStorage;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn executor(server: &MockServer) -> (RequestExecutor, Arc<TokenStore>) {
        let tokens = Arc::new(TokenStore::new(Arc::new(MockSessionStorage::new())));
        let executor =
            RequestExecutor::new(HttpClient::new().unwrap(), &server.uri(), Arc::clone(&tokens))
                .unwrap();
        (executor, tokens)
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let tokens = Arc::new(TokenStore::new(Arc::new(MockSessionStorage::new())));
        let result = RequestExecutor::new(HttpClient::new().unwrap(), "localhost:5000", tokens);
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[tokio::test]
    async fn test_attaches_bearer_and_json_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rewards/badges"))
            .and(header("authorization", "Bearer access-1"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (executor, tokens) = executor(&server).await;
        tokens.set_tokens("access-1", Some("refresh-1")).await.unwrap();

        let response = executor.execute(ApiRequest::get("/rewards/badges")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_refresh_sends_refresh_token_and_keeps_it_when_not_rotated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Token expired"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({"refresh_token": "refresh-1"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/profile"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (executor, tokens) = executor(&server).await;
        tokens.set_tokens("stale", Some("refresh-1")).await.unwrap();

        let response = executor.execute(ApiRequest::get("/auth/profile")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(tokens.access_token().await.as_deref(), Some("fresh"));
        assert_eq!(tokens.refresh_token().await.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn test_unauthenticated_401_is_returned_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (executor, tokens) = executor(&server).await;
        tokens.set_tokens("access-1", Some("refresh-1")).await.unwrap();

        let request = ApiRequest::post("/auth/login").unauthenticated();
        let response = executor.execute(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(tokens.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_no_refresh_token_clears_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payments/history"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let (executor, tokens) = executor(&server).await;
        tokens.set_tokens("access-only", None).await.unwrap();

        let err = executor.execute(ApiRequest::get("/payments/history")).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
        assert!(!tokens.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_server_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analytics/dashboard"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let (executor, tokens) = executor(&server).await;
        tokens.set_tokens("access-1", Some("refresh-1")).await.unwrap();

        let response = executor.execute(ApiRequest::get("/analytics/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

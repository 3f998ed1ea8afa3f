//! Shared fixtures for infra integration tests
//!
//! Every test gets its own wiremock server and an in-memory session store so
//! call counts and stored tokens can be asserted directly.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use wastewise_common::testing::MockSessionStorage;
use wastewise_infra::WasteWiseClient;
use wiremock::MockServer;

pub struct TestBackend {
    pub server: MockServer,
    pub storage: Arc<MockSessionStorage>,
    pub client: Arc<WasteWiseClient>,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self::start_with(|builder| builder).await
    }

    pub async fn start_with(
        configure: impl FnOnce(
            wastewise_infra::api::WasteWiseClientBuilder,
        ) -> wastewise_infra::api::WasteWiseClientBuilder,
    ) -> Self {
        let server = MockServer::start().await;
        let storage = Arc::new(MockSessionStorage::new());
        let builder = WasteWiseClient::builder()
            .base_url(format!("{}/api", server.uri()))
            .storage(storage.clone());
        let client = Arc::new(configure(builder).build().expect("client"));
        Self { server, storage, client }
    }

    /// Seed a session as if the user had signed in earlier
    pub async fn sign_in(&self, access_token: &str, refresh_token: Option<&str>) {
        self.client
            .token_store()
            .set_tokens(access_token, refresh_token)
            .await
            .expect("seed tokens");
    }

    pub async fn request_count(&self, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == path)
            .count()
    }

    /// Paths of every received request, in arrival order
    pub async fn request_paths(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| request.url.path().to_string())
            .collect()
    }
}

pub fn profile_json() -> Value {
    json!({
        "id": "user_42",
        "email": "asha@wastewise.in",
        "full_name": "Asha Rao",
        "role": "user",
        "city": "Pune"
    })
}

pub fn login_json(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "success": true,
        "message": "Login successful",
        "user": profile_json(),
        "tokens": {
            "access_token": access_token,
            "refresh_token": refresh_token,
            "token_type": "Bearer"
        }
    })
}

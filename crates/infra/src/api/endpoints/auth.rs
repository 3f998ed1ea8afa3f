//! Account endpoints
//!
//! The only endpoints that write the session: login and registration store
//! tokens, profile reads cache the user, logout clears everything.

use serde_json::json;
use tracing::{info, instrument, warn};
use wastewise_domain::{
    Acknowledgement, AuthResponse, LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest,
    UserProfile,
};

use crate::api::client::{decode, take_field};
use crate::api::{ApiError, ApiRequest, WasteWiseClient};

/// Credential rejections on unauthenticated routes are not session expiry
fn credentials_rejected(err: ApiError) -> ApiError {
    match err {
        ApiError::Auth(message) => ApiError::Client { status: 401, message },
        other => other,
    }
}

impl WasteWiseClient {
    /// Cache the profile of a freshly stored session; a profile that cannot
    /// be persisted takes the tokens down with it
    async fn cache_signed_in_user(&self, user: &UserProfile) -> Result<(), ApiError> {
        if let Err(e) = self.token_store().set_current_user(user.clone()).await {
            warn!(error = %e, "Failed to persist profile, discarding session");
            self.token_store().clear_tokens().await;
            return Err(e.into());
        }
        Ok(())
    }

    /// `POST /auth/register`
    ///
    /// Stores the session only when the backend returns tokens; otherwise the
    /// caller proceeds to the response's `next_step` (usually sign-in).
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        registration.validate()?;

        let request = ApiRequest::post("/auth/register").json(registration)?.unauthenticated();
        let body = self.call(request, "Registration failed").await.map_err(credentials_rejected)?;
        let response: AuthResponse = decode(body)?;

        if let Some(tokens) = &response.tokens {
            self.token_store()
                .set_tokens(&tokens.access_token, tokens.refresh_token.as_deref())
                .await?;
        }
        if let Some(user) = &response.user {
            self.cache_signed_in_user(user).await?;
        }
        info!(signed_in = response.tokens.is_some(), "Registration succeeded");
        Ok(response)
    }

    /// `POST /auth/login`; stores the token pair and caches the profile
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<UserProfile, ApiError> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember_me,
        };
        credentials.validate()?;

        let request = ApiRequest::post("/auth/login").json(&credentials)?.unauthenticated();
        let body = self.call(request, "Login failed").await.map_err(credentials_rejected)?;
        let response: AuthResponse = decode(body)?;

        let tokens = response
            .tokens
            .ok_or_else(|| ApiError::Decode("Login response carried no tokens".to_string()))?;
        let user = response
            .user
            .ok_or_else(|| ApiError::Decode("Login response carried no user".to_string()))?;

        self.token_store().set_tokens(&tokens.access_token, tokens.refresh_token.as_deref()).await?;
        self.cache_signed_in_user(&user).await?;
        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// `POST /auth/logout`, best effort; the local session is always cleared
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if self.token_store().access_token().await.is_some() {
            let request = ApiRequest::post("/auth/logout");
            if let Err(e) = self.call(request, "Logout failed").await {
                warn!(error = %e, "Remote logout failed");
            }
        }
        self.token_store().clear_tokens().await;
        info!("Signed out");
    }

    /// `GET /auth/profile`; refreshes the cached profile
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::get("/auth/profile");
        let user: UserProfile = self.call_field(request, "user", "Failed to load profile").await?;
        self.token_store().set_current_user(user.clone()).await?;
        Ok(user)
    }

    /// `PUT /auth/profile`; caches the updated profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::put("/auth/profile").json(update)?;
        let body = self.call(request, "Failed to update profile").await?;
        let user: UserProfile = take_field(body, "user")?;
        self.token_store().set_current_user(user.clone()).await?;
        Ok(user)
    }

    /// `POST /auth/change-password`
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<Acknowledgement, ApiError> {
        let change = PasswordChange::new(current_password, new_password);
        change.validate()?;

        let request = ApiRequest::post("/auth/change-password").json(&change)?;
        self.call_as(request, "Failed to change password").await
    }

    /// `POST /auth/forgot-password`
    pub async fn forgot_password(&self, email: &str) -> Result<Acknowledgement, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::Validation("Please provide your email address".to_string()));
        }
        let request = ApiRequest::post("/auth/forgot-password")
            .json_value(json!({ "email": email }))
            .unauthenticated();
        self.call_as(request, "Password reset request failed").await
    }

    /// Cached profile; never touches the network
    pub async fn current_user(&self) -> Option<UserProfile> {
        self.token_store().current_user().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token_store().is_authenticated().await
    }
}

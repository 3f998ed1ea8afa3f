//! Token store with write-through persistence
//!
//! Holds the session for the lifetime of a client:
//! - Token pair loaded from storage on startup
//! - Atomic replacement of both tokens (login, refresh)
//! - Cached user profile served without network access
//! - Idempotent teardown on logout or irrecoverable refresh failure

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use wastewise_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_DATA_KEY};
use wastewise_domain::UserProfile;

use super::traits::{SessionStorage, StorageError};
use super::types::SessionTokens;

/// Error type for token store operations
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Persisting the session failed; the in-memory session was cleared
    #[error("Failed to persist session: {0}")]
    Storage(#[from] StorageError),

    /// Profile could not be serialised for storage
    #[error("Failed to serialise user profile: {0}")]
    Serialization(String),
}

#[derive(Default)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<UserProfile>,
}

/// Single source of truth for authentication state
///
/// All mutations take one write lock that spans both the in-memory state and
/// the storage writes, so readers never observe a half-replaced token pair.
pub struct TokenStore {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<SessionState>,
}

impl TokenStore {
    /// Create an empty store over the given storage backend
    ///
    /// Call [`TokenStore::initialize`] to restore a persisted session.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage, state: RwLock::new(SessionState::default()) }
    }

    /// Load tokens and the cached profile from storage
    ///
    /// Storage failures leave the store unauthenticated rather than
    /// surfacing an error. A refresh token without an access token is
    /// ignored, since it cannot belong to a live session.
    ///
    /// # Returns
    /// `true` when a session was restored
    pub async fn initialize(&self) -> bool {
        let mut state = self.state.write().await;

        let access_token = match self.storage.get(ACCESS_TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session, starting signed out");
                *state = SessionState::default();
                return false;
            }
        };

        let Some(access_token) = access_token else {
            debug!("No stored session found");
            *state = SessionState::default();
            return false;
        };

        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY).await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read stored refresh token");
            None
        });

        let user = match self.storage.get(USER_DATA_KEY).await {
            Ok(Some(raw)) => serde_json::from_str::<UserProfile>(&raw)
                .map_err(|e| warn!(error = %e, "Discarding unreadable cached profile"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read cached profile");
                None
            }
        };

        *state = SessionState { access_token: Some(access_token), refresh_token, user };
        info!("Session restored from storage");
        true
    }

    /// Replace both tokens
    ///
    /// Passing `None` for the refresh token removes any stored one, so the
    /// pair always comes from the same authentication event. Later requests
    /// use the new access token immediately.
    ///
    /// # Errors
    /// Returns `TokenStoreError::Storage` if persisting fails. The session is
    /// then cleared in memory and (best effort) in storage.
    pub async fn set_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), TokenStoreError> {
        let mut state = self.state.write().await;

        if let Err(e) = self.persist_tokens(access_token, refresh_token).await {
            warn!(error = %e, "Failed to persist tokens, clearing session");
            self.purge_storage().await;
            *state = SessionState::default();
            return Err(e.into());
        }

        state.access_token = Some(access_token.to_string());
        state.refresh_token = refresh_token.map(str::to_string);
        debug!(has_refresh = refresh_token.is_some(), "Tokens stored");
        Ok(())
    }

    async fn persist_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, access_token).await?;
        match refresh_token {
            Some(refresh) => self.storage.set(REFRESH_TOKEN_KEY, refresh).await,
            None => self.storage.remove(REFRESH_TOKEN_KEY).await,
        }
    }

    /// Cache the user profile in memory and storage
    ///
    /// # Errors
    /// Returns error if the profile cannot be serialised or persisted; the
    /// in-memory cache is left unchanged in that case.
    pub async fn set_current_user(&self, profile: UserProfile) -> Result<(), TokenStoreError> {
        let raw = serde_json::to_string(&profile)
            .map_err(|e| TokenStoreError::Serialization(e.to_string()))?;

        let mut state = self.state.write().await;
        self.storage.set(USER_DATA_KEY, &raw).await?;
        state.user = Some(profile);
        Ok(())
    }

    /// Remove tokens and the cached profile (logout)
    ///
    /// Idempotent. Storage failures are logged and never surfaced; memory is
    /// cleared regardless.
    pub async fn clear_tokens(&self) {
        let mut state = self.state.write().await;
        *state = SessionState::default();
        self.purge_storage().await;
        info!("Session cleared");
    }

    async fn purge_storage(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_DATA_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                warn!(key, error = %e, "Failed to remove session entry");
            }
        }
    }

    /// Whether a usable session exists
    ///
    /// True only when an access token is held in memory and storage still
    /// holds the same token. Any storage error counts as signed out.
    pub async fn is_authenticated(&self) -> bool {
        let state = self.state.read().await;
        let Some(access_token) = state.access_token.as_deref() else {
            return false;
        };

        match self.storage.get(ACCESS_TOKEN_KEY).await {
            Ok(Some(stored)) => stored == access_token,
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Failed to confirm stored session");
                false
            }
        }
    }

    /// Cached profile from the last login or profile fetch; no network access
    pub async fn current_user(&self) -> Option<UserProfile> {
        self.state.read().await.user.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    /// Both tokens read under one lock
    pub async fn tokens(&self) -> SessionTokens {
        let state = self.state.read().await;
        SessionTokens {
            access_token: state.access_token.clone(),
            refresh_token: state.refresh_token.clone(),
        }
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

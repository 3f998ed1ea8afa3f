//! Session storage layered on top of `KeychainProvider`.
//!
//! Each session key (`access_token`, `refresh_token`, `user_data`) becomes one
//! keychain entry under the provider's service name, matching the key names
//! the web and mobile clients use in their own storage.

use async_trait::async_trait;

use crate::auth::traits::{SessionStorage, StorageError};
use crate::security::{KeychainError, KeychainProvider};

impl From<KeychainError> for StorageError {
    fn from(err: KeychainError) -> Self {
        match err {
            KeychainError::NotFound => Self::Io("keychain entry missing".to_string()),
            KeychainError::AccessFailed(msg) => Self::Unavailable(msg),
        }
    }
}

#[async_trait]
impl SessionStorage for KeychainProvider {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.get_secret(key) {
            Ok(value) => Ok(Some(value)),
            Err(KeychainError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_secret(key, value).map_err(Into::into)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.delete_secret(key).map_err(Into::into)
    }
}

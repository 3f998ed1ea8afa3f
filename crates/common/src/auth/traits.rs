//! Storage abstraction for the client session
//!
//! This trait enables dependency injection and testing by abstracting the
//! durable key/value store (platform keychain, file, memory).

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by session storage backends
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Backend could not be reached (locked keychain, missing service, ...)
    #[error("Session storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded
    #[error("Session storage corrupted: {0}")]
    Corrupt(String),

    /// Read or write failed
    #[error("Session storage I/O failed: {0}")]
    Io(String),
}

impl From<StorageError> for wastewise_domain::WasteWiseError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Durable key/value storage for session data
///
/// Values are opaque strings. Implementations must make `remove` idempotent:
/// removing an absent key succeeds.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read a value
    ///
    /// # Returns
    /// `None` when the key has never been written or was removed
    ///
    /// # Errors
    /// Returns error if the backend cannot be read
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    /// Returns error if the backend rejects the write
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value (idempotent)
    ///
    /// # Errors
    /// Returns error if the backend rejects the deletion
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

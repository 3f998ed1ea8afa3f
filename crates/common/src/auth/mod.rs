//! Client session management
//!
//! The [`TokenStore`] is the single source of truth for authentication state.
//! It keeps the bearer/refresh token pair and the cached user profile in
//! memory and mirrors them into durable storage under fixed keys:
//!
//! | key             | value                         |
//! |-----------------|-------------------------------|
//! | `access_token`  | bearer token                  |
//! | `refresh_token` | refresh token (optional)      |
//! | `user_data`     | JSON-serialised `UserProfile` |
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   TokenStore    │  in-memory session + write-through
//! └────────┬────────┘
//!          │
//!          └──► dyn SessionStorage
//!                  ├──► KeychainProvider     (platform keychain)
//!                  ├──► FileSessionStorage   (JSON document)
//!                  └──► MemorySessionStorage (process lifetime)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use wastewise_common::auth::TokenStore;
//! use wastewise_common::storage::MemorySessionStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = TokenStore::new(Arc::new(MemorySessionStorage::new()));
//! store.initialize().await;
//!
//! store.set_tokens("access", Some("refresh")).await?;
//! assert!(store.is_authenticated().await);
//!
//! store.clear_tokens().await;
//! assert!(!store.is_authenticated().await);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "platform")]
pub mod keychain;
pub mod token_store;
pub mod traits;
pub mod types;

pub use token_store::{TokenStore, TokenStoreError};
pub use traits::{SessionStorage, StorageError};
pub use types::SessionTokens;

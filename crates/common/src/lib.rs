//! Shared session infrastructure for WasteWise client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `runtime`: session storage abstraction, file/memory backends, token store
//! - `platform`: OS keychain backend (macOS Keychain, Windows Credential
//!   Manager, Linux Secret Service)
//! - `test-utils`: in-memory doubles with failure injection

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;
#[cfg(feature = "runtime")]
pub mod storage;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "runtime")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use auth::{SessionStorage, SessionTokens, StorageError, TokenStore, TokenStoreError};
#[cfg(feature = "platform")]
pub use security::{KeychainError, KeychainProvider};
#[cfg(feature = "runtime")]
pub use storage::{FileSessionStorage, MemorySessionStorage};

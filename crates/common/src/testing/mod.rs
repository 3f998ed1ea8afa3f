//! Testing utilities and helpers
//!
//! - **[`mocks`]**: Mock implementations of session traits
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # {
//! use wastewise_common::testing::MockSessionStorage;
//!
//! let storage = MockSessionStorage::new();
//! storage.set_fail_writes(true);
//! # }
//! ```

pub mod mocks;

pub use mocks::MockSessionStorage;

//! Shared helpers for domain types

pub mod serde;
pub mod validation;

pub use validation::{require_fields, validate_email};

//! # WasteWise Domain
//!
//! Business domain types and models for the WasteWise client.
//!
//! This crate contains:
//! - Backend contract types (profiles, bookings, payments, rewards, ...)
//! - Domain error types and Result definitions
//! - Client configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other WasteWise crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

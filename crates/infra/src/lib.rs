//! # WasteWise Infrastructure
//!
//! Infrastructure implementations for the WasteWise client.
//!
//! This crate contains:
//! - The backend API client: request executor with token refresh, and the
//!   typed domain endpoints
//! - The HTTP transport
//! - Payment adapters: `PaymentApi` for the client, gateway selection and the
//!   simulated gateway
//! - Configuration loading, session storage selection and tracing setup
//!
//! ## Architecture
//! - Implements ports defined in `wastewise-core`
//! - Depends on `wastewise-common` for the token store and storage backends
//! - Contains all "impure" code (network, filesystem, keychain)

#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod http;
pub mod observability;
pub mod payments;
pub mod storage;

// Re-export commonly used items
pub use api::{ApiError, ApiErrorCategory, ApiRequest, RequestExecutor, WasteWiseClient};
pub use http::{HttpClient, HttpClientBuilder};
pub use payments::{select_gateway, SimulatedGateway};
pub use storage::session_storage;

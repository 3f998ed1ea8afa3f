//! WasteWise backend API
//!
//! - [`RequestExecutor`]: bearer attachment, one-shot 401 refresh and retry
//! - [`WasteWiseClient`]: typed domain endpoints over the executor
//! - [`ApiError`]: error taxonomy shared by every endpoint

pub mod client;
pub mod endpoints;
pub mod errors;
pub mod executor;
pub mod request;

pub use client::{WasteWiseClient, WasteWiseClientBuilder};
pub use errors::{error_message, ApiError, ApiErrorCategory};
pub use executor::RequestExecutor;
pub use request::{ApiRequest, MultipartField, RequestBody};

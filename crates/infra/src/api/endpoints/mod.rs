//! Domain endpoints
//!
//! Each module adds an `impl WasteWiseClient` block for one backend area.
//! Endpoints build an [`ApiRequest`](super::ApiRequest), hand it to the
//! executor and decode the documented response wrapper. None of them handle
//! 401s; that is the executor's job.

mod analytics;
mod auth;
mod bookings;
mod classification;
mod health;
mod payments;
mod rewards;
mod services;

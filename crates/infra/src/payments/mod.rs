//! Payment adapters
//!
//! Binds the core payment orchestrator to this crate: the backend client
//! implements `PaymentApi`, and [`select_gateway`] decides which checkout
//! gateway a build may use.

pub mod api;
pub mod selection;
pub mod simulated;

pub use selection::select_gateway;
pub use simulated::SimulatedGateway;

//! Payment orchestration
//!
//! Drives one payment attempt per booking through
//! `Initiating → Initiated → AwaitingGateway → Verifying → Settled`:
//!
//! ```text
//! pay() ──► PaymentApi::initiate ──► PaymentGateway::open
//!                                         │
//!            on_dismiss / cancel() ◄──────┤ (AwaitingGateway)
//!            on_failure ──► Settled(Failure)
//!            on_success ──► PaymentApi::verify ──► refresh views ──► Settled(Success)
//! ```
//!
//! The orchestrator never polls the gateway and never infers an outcome from
//! elapsed time; only a callback moves an attempt out of `AwaitingGateway`.

pub mod ports;
pub mod service;
pub mod state;

pub use ports::{
    BackendError, CheckoutCallbacks, CheckoutOptions, GatewayError, GatewayEvent, GatewayFailure,
    GatewaySuccess, PaymentApi, PaymentGateway,
};
pub use service::{PaymentOrchestrator, PaymentReceipt, PaymentRequest, RefreshedViews};
pub use state::{PaymentError, PaymentPhase, PendingPayment, SettlementOutcome};

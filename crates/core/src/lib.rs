//! Business logic layer for the WasteWise client
//!
//! This crate owns the payment confirmation protocol. It talks to the backend
//! and to the checkout widget only through the ports in [`payment::ports`],
//! which are implemented by `wastewise-infra`.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod payment;

pub use payment::{
    BackendError, CheckoutCallbacks, CheckoutOptions, GatewayError, GatewayEvent, GatewayFailure,
    GatewaySuccess, PaymentApi, PaymentError, PaymentGateway, PaymentOrchestrator, PaymentPhase,
    PaymentReceipt, PaymentRequest, PendingPayment, RefreshedViews, SettlementOutcome,
};

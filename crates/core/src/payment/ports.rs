//! Ports the payment orchestrator depends on
//!
//! [`PaymentApi`] is the backend half (initiate, verify, dependent views) and
//! [`PaymentGateway`] is the checkout widget half. Gateways report back through
//! [`CheckoutCallbacks`]; the first callback fired wins and later ones are
//! ignored.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;
use wastewise_domain::{
    BookingPage, InitiatePayment, PaymentHistory, PaymentOrder, VerifyPayment, VerifyResponse,
};

/// Failure reported by a [`PaymentApi`] implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
    /// The session expired and could not be refreshed
    pub auth_required: bool,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), auth_required: false }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self { message: message.into(), auth_required: true }
    }
}

/// Backend operations used by a payment attempt
#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Create a gateway order for a booking (`POST /payments/initiate`)
    async fn initiate(&self, request: &InitiatePayment) -> Result<PaymentOrder, BackendError>;

    /// Confirm a gateway payment (`POST /payments/verify`)
    ///
    /// Implementations may return `Ok` with `success: false`; the orchestrator
    /// treats that the same as an error.
    async fn verify(&self, request: &VerifyPayment) -> Result<VerifyResponse, BackendError>;

    /// Reload payment history after a settled payment
    async fn payment_history(&self) -> Result<PaymentHistory, BackendError>;

    /// Reload the booking list after a settled payment
    async fn bookings(&self) -> Result<BookingPage, BackendError>;
}

/// Everything a checkout widget needs to take a payment
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOptions {
    /// Public key id of the gateway account, when one is configured
    pub key_id: Option<String>,
    pub order_id: String,
    /// Amount in minor units (paise)
    pub amount_minor: u64,
    pub currency: String,
    pub description: String,
    pub booking_id: String,
    /// Extra widget options prepared by the backend (theme, prefill, ...)
    pub extra: Option<Value>,
}

/// Ids returned by the gateway on success, forwarded verbatim to verify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySuccess {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Decline reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayFailure {
    pub code: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    Success(GatewaySuccess),
    Failure(GatewayFailure),
    Dismissed,
}

/// Failure to open the checkout at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),

    #[error("Payment gateway misconfigured: {0}")]
    Misconfigured(String),
}

/// Completion handle given to a gateway when checkout opens
///
/// Clones share the same underlying channel, so a gateway can hand one clone
/// to each of its event handlers.
#[derive(Debug, Clone)]
pub struct CheckoutCallbacks {
    sender: Arc<Mutex<Option<oneshot::Sender<GatewayEvent>>>>,
}

impl CheckoutCallbacks {
    /// Create a callbacks handle and the receiver the orchestrator waits on
    pub fn channel() -> (Self, oneshot::Receiver<GatewayEvent>) {
        let (tx, rx) = oneshot::channel();
        (Self { sender: Arc::new(Mutex::new(Some(tx))) }, rx)
    }

    /// Report a completed payment. Returns `false` if an outcome was already
    /// reported or nobody is waiting any more.
    pub fn on_success(&self, success: GatewaySuccess) -> bool {
        self.deliver(GatewayEvent::Success(success))
    }

    pub fn on_failure(&self, failure: GatewayFailure) -> bool {
        self.deliver(GatewayEvent::Failure(failure))
    }

    /// The user closed the checkout without paying
    pub fn on_dismiss(&self) -> bool {
        self.deliver(GatewayEvent::Dismissed)
    }

    pub fn is_settled(&self) -> bool {
        self.sender.lock().as_ref().map_or(true, oneshot::Sender::is_closed)
    }

    fn deliver(&self, event: GatewayEvent) -> bool {
        match self.sender.lock().take() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }
}

/// Checkout widget integration
///
/// `open` must return promptly; the outcome arrives later through exactly one
/// of the callbacks, from any thread.
pub trait PaymentGateway: Send + Sync {
    /// # Errors
    /// Returns `GatewayError` when the checkout cannot be shown.
    fn open(
        &self,
        options: CheckoutOptions,
        callbacks: CheckoutCallbacks,
    ) -> Result<(), GatewayError>;

    /// Whether receipts produced through this gateway are simulated
    fn is_simulated(&self) -> bool {
        false
    }
}

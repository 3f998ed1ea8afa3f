//! Mock payment ports
//!
//! `MockPaymentApi` records every backend call in order and can hold the
//! verify call open; `ManualGateway` captures checkout sessions so a test can
//! fire the gateway callbacks itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;
use wastewise_core::payment::{
    BackendError, CheckoutCallbacks, CheckoutOptions, GatewayError, PaymentApi, PaymentGateway,
};
use wastewise_domain::{
    BookingPage, InitiatePayment, PaymentHistory, PaymentOrder, VerifyPayment, VerifyResponse,
};

/// In-memory `PaymentApi` with a call log
#[derive(Default, Clone)]
pub struct MockPaymentApi {
    calls: Arc<Mutex<Vec<String>>>,
    verified: Arc<Mutex<Vec<VerifyPayment>>>,
    reject_verify: Arc<AtomicBool>,
    fail_history: Arc<AtomicBool>,
    hold_verify: Arc<AtomicBool>,
    verify_entered: Arc<Notify>,
    verify_release: Arc<Notify>,
}

impl MockPaymentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify answers `success: false`
    pub fn rejecting_verify(self) -> Self {
        self.reject_verify.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_history(self) -> Self {
        self.fail_history.store(true, Ordering::SeqCst);
        self
    }

    /// Verify blocks until [`release_verify`](Self::release_verify)
    pub fn holding_verify(self) -> Self {
        self.hold_verify.store(true, Ordering::SeqCst);
        self
    }

    pub async fn wait_for_verify(&self) {
        self.verify_entered.notified().await;
    }

    pub fn release_verify(&self) {
        self.verify_release.notify_one();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == name).count()
    }

    pub fn verified(&self) -> Vec<VerifyPayment> {
        self.verified.lock().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().push(name.to_string());
    }
}

#[async_trait]
impl PaymentApi for MockPaymentApi {
    async fn initiate(&self, request: &InitiatePayment) -> Result<PaymentOrder, BackendError> {
        self.record("initiate");
        PaymentOrder::from_response(json!({
            "success": true,
            "payment_details": {
                "payment_id": format!("pay_{}", request.booking_id),
                "order_id": format!("order_{}", request.booking_id),
                "amount": request.amount,
                "currency": request.currency,
            },
            "gateway_key": "rzp_test_key",
        }))
        .map_err(|e| BackendError::new(e.to_string()))
    }

    async fn verify(&self, request: &VerifyPayment) -> Result<VerifyResponse, BackendError> {
        self.record("verify");
        self.verified.lock().push(request.clone());

        if self.hold_verify.load(Ordering::SeqCst) {
            self.verify_entered.notify_one();
            self.verify_release.notified().await;
        }

        if self.reject_verify.load(Ordering::SeqCst) {
            return Ok(VerifyResponse {
                success: false,
                message: Some("Invalid payment signature".to_string()),
                ..Default::default()
            });
        }
        Ok(VerifyResponse {
            success: true,
            message: Some("Payment verified successfully".to_string()),
            transaction_id: Some("txn_1".to_string()),
            booking_status: Some("confirmed".to_string()),
            ..Default::default()
        })
    }

    async fn payment_history(&self) -> Result<PaymentHistory, BackendError> {
        self.record("payment_history");
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(BackendError::new("Failed to fetch payment history"));
        }
        Ok(PaymentHistory::default())
    }

    async fn bookings(&self) -> Result<BookingPage, BackendError> {
        self.record("bookings");
        Ok(BookingPage::default())
    }
}

/// Gateway that hands its sessions to the test
#[derive(Default, Clone)]
pub struct ManualGateway {
    sessions: Arc<Mutex<Vec<(CheckoutOptions, CheckoutCallbacks)>>>,
    opened: Arc<Notify>,
}

impl ManualGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next checkout to open and take it
    pub async fn next_session(&self) -> (CheckoutOptions, CheckoutCallbacks) {
        loop {
            if let Some(session) = self.sessions.lock().pop() {
                return session;
            }
            self.opened.notified().await;
        }
    }
}

impl PaymentGateway for ManualGateway {
    fn open(
        &self,
        options: CheckoutOptions,
        callbacks: CheckoutCallbacks,
    ) -> Result<(), GatewayError> {
        self.sessions.lock().push((options, callbacks));
        self.opened.notify_one();
        Ok(())
    }
}

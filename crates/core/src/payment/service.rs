//! Payment orchestrator - single-flight payment attempts per booking

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use wastewise_domain::constants::DEFAULT_CURRENCY;
use wastewise_domain::{
    BookingPage, InitiatePayment, PaymentHistory, PaymentMethod, PaymentOrder, PaymentRecord,
    VerifyPayment,
};

use super::ports::{
    CheckoutCallbacks, CheckoutOptions, GatewayEvent, GatewaySuccess, PaymentApi, PaymentGateway,
};
use super::state::{PaymentError, PaymentPhase, PendingPayment, SettlementOutcome};

/// Settled attempts kept for [`PaymentOrchestrator::state`] lookups
const SETTLED_RETAINED: usize = 32;

/// What the caller asks to pay
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub booking_id: String,
    /// Major units (rupees)
    pub amount: f64,
    pub method: PaymentMethod,
    /// Shown in the checkout; defaults to a booking reference
    pub description: Option<String>,
}

impl PaymentRequest {
    pub fn new(booking_id: impl Into<String>, amount: f64, method: PaymentMethod) -> Self {
        Self { booking_id: booking_id.into(), amount, method, description: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Views reloaded after a verified payment
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshedViews {
    pub history: PaymentHistory,
    pub bookings: BookingPage,
}

/// Result of a verified payment
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub booking_id: String,
    /// Backend payment id from initiate
    pub payment_id: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub amount: f64,
    pub transaction_id: Option<String>,
    pub booking_status: Option<String>,
    pub payment: Option<PaymentRecord>,
    /// Produced by the simulated gateway
    pub simulated: bool,
    pub settled_at: DateTime<Utc>,
    /// `None` when the post-payment reload failed
    pub views: Option<RefreshedViews>,
}

#[derive(Debug)]
struct Attempt {
    id: u64,
    phase: PaymentPhase,
    cancel: CancellationToken,
    pending: Option<PendingPayment>,
}

type Attempts = Mutex<HashMap<String, Attempt>>;

/// Drives initiate → checkout → verify for one booking at a time
///
/// Attempt state lives behind a `parking_lot` mutex that is never held across
/// an await point.
pub struct PaymentOrchestrator {
    api: Arc<dyn PaymentApi>,
    gateway: Arc<dyn PaymentGateway>,
    attempts: Arc<Attempts>,
    next_attempt: AtomicU64,
    currency: String,
    gateway_key_id: Option<String>,
}

impl PaymentOrchestrator {
    pub fn new(api: Arc<dyn PaymentApi>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            api,
            gateway,
            attempts: Arc::new(Mutex::new(HashMap::new())),
            next_attempt: AtomicU64::new(1),
            currency: DEFAULT_CURRENCY.to_string(),
            gateway_key_id: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Key id handed to the checkout when the backend does not supply one
    pub fn with_gateway_key_id(mut self, key_id: Option<String>) -> Self {
        self.gateway_key_id = key_id;
        self
    }

    /// Current phase of a booking's payment (`Idle` when unknown)
    pub fn state(&self, booking_id: &str) -> PaymentPhase {
        self.attempts.lock().get(booking_id).map_or(PaymentPhase::Idle, |a| a.phase)
    }

    /// Order details of the in-flight attempt, if one has been initiated
    pub fn pending(&self, booking_id: &str) -> Option<PendingPayment> {
        self.attempts
            .lock()
            .get(booking_id)
            .filter(|a| a.phase.is_in_flight())
            .and_then(|a| a.pending.clone())
    }

    /// Abandon an attempt that is waiting on the checkout
    ///
    /// # Errors
    /// - `PaymentError::NotCancellable` once verification has started (or
    ///   before the checkout has opened)
    /// - `PaymentError::NoActivePayment` when nothing is in flight
    pub fn cancel(&self, booking_id: &str) -> Result<(), PaymentError> {
        let mut attempts = self.attempts.lock();
        let phase = attempts.get(booking_id).map(|a| a.phase);
        match phase {
            Some(PaymentPhase::AwaitingGateway) => {
                if let Some(attempt) = attempts.remove(booking_id) {
                    attempt.cancel.cancel();
                }
                info!(booking_id, "Payment cancelled by user");
                Ok(())
            }
            Some(phase) if phase.is_in_flight() => Err(PaymentError::NotCancellable),
            _ => Err(PaymentError::NoActivePayment),
        }
    }

    /// Run one payment attempt to completion
    ///
    /// # Errors
    /// - `AlreadyInProgress` if another attempt for the booking is in flight
    /// - `Initiation` / `Gateway` if checkout could not start
    /// - `Cancelled` on dismiss or [`cancel`](Self::cancel)
    /// - `Declined` when the gateway rejects the payment
    /// - `VerificationFailed` when the backend does not confirm it
    #[instrument(skip(self, request), fields(booking_id = %request.booking_id))]
    pub async fn pay(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        let booking_id = request.booking_id.clone();
        let (attempt_id, cancel) = self.claim(&booking_id)?;
        let _guard = AttemptGuard {
            attempts: Arc::clone(&self.attempts),
            booking_id: booking_id.clone(),
            attempt_id,
        };

        let initiate = InitiatePayment {
            booking_id: booking_id.clone(),
            amount: request.amount,
            payment_method: request.method,
            currency: self.currency.clone(),
        };
        initiate.validate().map_err(|e| PaymentError::Initiation(e.to_string()))?;

        let order = self.api.initiate(&initiate).await.map_err(|e| {
            warn!(error = %e, "Payment initiation failed");
            PaymentError::Initiation(e.message)
        })?;
        debug!(order_id = %order.order_id, "Gateway order created");

        let pending = PendingPayment {
            booking_id: booking_id.clone(),
            amount: order.amount,
            gateway_order_id: order.order_id.clone(),
            payment_id: order.payment_id.clone(),
        };
        self.advance(&booking_id, attempt_id, PaymentPhase::Initiated, Some(pending))?;

        let options = self.checkout_options(&request, &order);
        let (callbacks, events) = CheckoutCallbacks::channel();
        self.advance(&booking_id, attempt_id, PaymentPhase::AwaitingGateway, None)?;
        self.gateway.open(options, callbacks).map_err(|e| {
            warn!(error = %e, "Checkout could not be opened");
            PaymentError::Gateway(e.to_string())
        })?;

        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(PaymentError::Cancelled),
            event = events => event,
        };

        let success = match event {
            Ok(GatewayEvent::Success(success)) => success,
            Ok(GatewayEvent::Failure(failure)) => {
                warn!(code = ?failure.code, reason = %failure.reason, "Payment declined");
                self.settle(&booking_id, attempt_id, SettlementOutcome::Failure);
                return Err(PaymentError::Declined { code: failure.code, reason: failure.reason });
            }
            // A gateway that drops its callbacks without reporting is a dismissal.
            Ok(GatewayEvent::Dismissed) | Err(_) => {
                info!("Checkout dismissed");
                return Err(PaymentError::Cancelled);
            }
        };

        // Cancel may have won the lock between the callback and here.
        self.advance(&booking_id, attempt_id, PaymentPhase::Verifying, None)?;
        self.verify(&booking_id, attempt_id, &order, success).await
    }

    async fn verify(
        &self,
        booking_id: &str,
        attempt_id: u64,
        order: &PaymentOrder,
        success: GatewaySuccess,
    ) -> Result<PaymentReceipt, PaymentError> {
        let request = VerifyPayment {
            payment_id: order.payment_id.clone(),
            gateway_order_id: success.order_id,
            gateway_payment_id: success.payment_id,
            gateway_signature: success.signature,
        };

        let response = match self.api.verify(&request).await {
            Ok(response) if response.success => response,
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Payment verification failed".to_string());
                warn!(%message, "Backend rejected payment verification");
                self.settle(booking_id, attempt_id, SettlementOutcome::Failure);
                return Err(PaymentError::VerificationFailed(message));
            }
            Err(e) => {
                warn!(error = %e, "Payment verification request failed");
                self.settle(booking_id, attempt_id, SettlementOutcome::Failure);
                return Err(PaymentError::VerificationFailed(e.message));
            }
        };

        let views = self.refresh_views().await;
        self.settle(booking_id, attempt_id, SettlementOutcome::Success);
        info!(payment_id = %request.payment_id, "Payment verified");

        Ok(PaymentReceipt {
            booking_id: booking_id.to_string(),
            payment_id: request.payment_id,
            gateway_order_id: request.gateway_order_id,
            gateway_payment_id: request.gateway_payment_id,
            amount: order.amount,
            transaction_id: response.transaction_id,
            booking_status: response.booking_status,
            payment: response.payment,
            simulated: self.gateway.is_simulated(),
            settled_at: Utc::now(),
            views,
        })
    }

    /// Payment history first, then bookings
    async fn refresh_views(&self) -> Option<RefreshedViews> {
        let history = match self.api.payment_history().await {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Failed to refresh payment history after payment");
                return None;
            }
        };
        match self.api.bookings().await {
            Ok(bookings) => Some(RefreshedViews { history, bookings }),
            Err(e) => {
                warn!(error = %e, "Failed to refresh bookings after payment");
                None
            }
        }
    }

    fn checkout_options(&self, request: &PaymentRequest, order: &PaymentOrder) -> CheckoutOptions {
        CheckoutOptions {
            key_id: order.gateway_key.clone().or_else(|| self.gateway_key_id.clone()),
            order_id: order.order_id.clone(),
            amount_minor: order.amount_minor(),
            currency: order.currency.clone(),
            description: request
                .description
                .clone()
                .unwrap_or_else(|| format!("WasteWise booking {}", request.booking_id)),
            booking_id: request.booking_id.clone(),
            extra: order.options.clone(),
        }
    }

    fn claim(&self, booking_id: &str) -> Result<(u64, CancellationToken), PaymentError> {
        let mut attempts = self.attempts.lock();
        if attempts.get(booking_id).is_some_and(|a| a.phase.is_in_flight()) {
            debug!(booking_id, "Rejecting concurrent payment attempt");
            return Err(PaymentError::AlreadyInProgress { booking_id: booking_id.to_string() });
        }

        let id = self.next_attempt.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        attempts.insert(
            booking_id.to_string(),
            Attempt { id, phase: PaymentPhase::Initiating, cancel: cancel.clone(), pending: None },
        );
        Ok((id, cancel))
    }

    /// Move an in-flight attempt forward, failing if it was cancelled meanwhile
    fn advance(
        &self,
        booking_id: &str,
        attempt_id: u64,
        phase: PaymentPhase,
        pending: Option<PendingPayment>,
    ) -> Result<(), PaymentError> {
        let mut attempts = self.attempts.lock();
        match attempts.get_mut(booking_id) {
            Some(attempt) if attempt.id == attempt_id && !attempt.cancel.is_cancelled() => {
                attempt.phase = phase;
                if pending.is_some() {
                    attempt.pending = pending;
                }
                Ok(())
            }
            _ => Err(PaymentError::Cancelled),
        }
    }

    fn settle(&self, booking_id: &str, attempt_id: u64, outcome: SettlementOutcome) {
        let mut attempts = self.attempts.lock();
        if let Some(attempt) = attempts.get_mut(booking_id).filter(|a| a.id == attempt_id) {
            attempt.phase = PaymentPhase::Settled(outcome);
            attempt.pending = None;
        }
        prune_settled(&mut attempts);
    }
}

/// Forget the oldest settled attempts beyond [`SETTLED_RETAINED`]
fn prune_settled(attempts: &mut HashMap<String, Attempt>) {
    let mut settled: Vec<(u64, String)> = attempts
        .iter()
        .filter(|(_, a)| a.phase.is_settled())
        .map(|(booking_id, a)| (a.id, booking_id.clone()))
        .collect();
    if settled.len() <= SETTLED_RETAINED {
        return;
    }
    settled.sort_unstable();
    let excess = settled.len() - SETTLED_RETAINED;
    for (_, booking_id) in settled.into_iter().take(excess) {
        attempts.remove(&booking_id);
    }
    debug!(pruned = excess, "Dropped old settled payment attempts");
}

/// Returns the booking to `Idle` if an attempt ends without settling,
/// including when the `pay` future is dropped.
struct AttemptGuard {
    attempts: Arc<Attempts>,
    booking_id: String,
    attempt_id: u64,
}

impl Drop for AttemptGuard {
    fn drop(&mut self) {
        let mut attempts = self.attempts.lock();
        let unsettled = attempts
            .get(&self.booking_id)
            .is_some_and(|a| a.id == self.attempt_id && !a.phase.is_settled());
        if unsettled {
            attempts.remove(&self.booking_id);
        }
    }
}

//! Payment attempt phases and errors

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Success,
    Failure,
}

/// Where a booking's payment attempt currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentPhase {
    /// No attempt, or the last attempt was cancelled
    #[default]
    Idle,
    /// Claim held while the initiate call is in flight
    Initiating,
    Initiated,
    AwaitingGateway,
    Verifying,
    Settled(SettlementOutcome),
}

impl PaymentPhase {
    /// Phases that block a second attempt for the same booking
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Initiating | Self::Initiated | Self::AwaitingGateway | Self::Verifying)
    }

    pub fn is_settled(self) -> bool {
        matches!(self, Self::Settled(_))
    }
}

/// Order details held for the lifetime of one attempt. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPayment {
    pub booking_id: String,
    pub amount: f64,
    pub gateway_order_id: String,
    pub payment_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("A payment for booking {booking_id} is already in progress")]
    AlreadyInProgress { booking_id: String },

    #[error("Payment cancelled")]
    Cancelled,

    #[error("Payment declined: {reason}")]
    Declined { code: Option<String>, reason: String },

    #[error("Payment could not be confirmed: {0}")]
    VerificationFailed(String),

    #[error("Payment could not be started: {0}")]
    Initiation(String),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Payment is being verified and can no longer be cancelled")]
    NotCancellable,

    #[error("No payment in progress for this booking")]
    NoActivePayment,
}

impl PaymentError {
    /// Errors after which the user may simply try again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Declined { .. } | Self::Initiation(_) | Self::Gateway(_)
        )
    }
}

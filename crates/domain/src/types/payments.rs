//! Payment contract types
//!
//! Wire names for the gateway identifiers (`razorpay_*`) are part of the
//! backend contract and are mapped onto neutral field names here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::DEFAULT_CURRENCY;
use crate::impl_domain_status_conversions;
use crate::types::services::Pagination;
use crate::utils::require_fields;
use crate::utils::serde::{id_string, option_id_string};
use crate::{Result, WasteWiseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Netbanking,
    Wallet,
}

impl_domain_status_conversions!(PaymentMethod {
    Card => "card",
    Upi => "upi",
    Netbanking => "netbanking",
    Wallet => "wallet",
});

/// Body of `/payments/initiate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitiatePayment {
    pub booking_id: String,
    /// Major units (rupees)
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub currency: String,
}

impl InitiatePayment {
    pub fn new(booking_id: impl Into<String>, amount: f64, payment_method: PaymentMethod) -> Self {
        Self {
            booking_id: booking_id.into(),
            amount,
            payment_method,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// # Errors
    /// Returns `WasteWiseError::Validation` for a blank booking id or a
    /// non-positive amount.
    pub fn validate(&self) -> Result<()> {
        require_fields(&[("booking_id", &self.booking_id), ("currency", &self.currency)])?;
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(WasteWiseError::Validation(format!(
                "Payment amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Gateway order created by `/payments/initiate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOrder {
    #[serde(deserialize_with = "id_string")]
    pub payment_id: String,
    #[serde(deserialize_with = "id_string")]
    pub order_id: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, deserialize_with = "option_id_string")]
    pub booking_id: Option<String>,
    /// Public key for the checkout widget, present for card payments
    #[serde(default)]
    pub gateway_key: Option<String>,
    /// Checkout options prepared by the backend
    #[serde(default)]
    pub options: Option<Value>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl PaymentOrder {
    /// Decode an initiate response, flat or wrapped in `payment_details`.
    ///
    /// # Errors
    /// Returns `WasteWiseError::Serialization` when the order ids are missing.
    pub fn from_response(mut body: Value) -> Result<Self> {
        let details = body.get_mut("payment_details").map(Value::take);
        let mut order: Self = serde_json::from_value(details.unwrap_or_else(|| body.clone()))?;

        // Gateway fields live at the top level even when ids are nested.
        if order.gateway_key.is_none() {
            order.gateway_key = body.get("gateway_key").and_then(Value::as_str).map(String::from);
        }
        if order.options.is_none() {
            order.options = body.get("options").cloned();
        }
        Ok(order)
    }

    /// Amount in minor units (paise) as checkout widgets expect
    pub fn amount_minor(&self) -> u64 {
        let minor = (self.amount * 100.0).round();
        if minor.is_finite() && minor > 0.0 {
            minor as u64
        } else {
            0
        }
    }
}

/// Body of `/payments/verify`; ids are forwarded verbatim from the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPayment {
    pub payment_id: String,
    #[serde(rename = "razorpay_order_id")]
    pub gateway_order_id: String,
    #[serde(rename = "razorpay_payment_id")]
    pub gateway_payment_id: String,
    #[serde(rename = "razorpay_signature")]
    pub gateway_signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "option_id_string")]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payment: Option<PaymentRecord>,
    #[serde(default, deserialize_with = "option_id_string")]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub booking_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PaymentHistory {
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub summary: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PaymentMethods {
    #[serde(default)]
    pub payment_methods: Vec<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub gateway_info: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RefundResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub refund: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

use serde_json::json;
use tracing::{info, instrument};
use wastewise_domain::{
    InitiatePayment, PaymentHistory, PaymentMethods, PaymentOrder, RefundResponse, VerifyPayment,
    VerifyResponse,
};

use crate::api::request::path_id;
use crate::api::{ApiError, ApiRequest, WasteWiseClient};

impl WasteWiseClient {
    pub async fn payment_methods(&self) -> Result<PaymentMethods, ApiError> {
        self.call_as(ApiRequest::get("/payments/methods"), "Failed to load payment methods").await
    }

    pub async fn payment_history(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<PaymentHistory, ApiError> {
        let request = ApiRequest::get("/payments/history")
            .query([("limit", limit.to_string()), ("offset", offset.to_string())]);
        self.call_as(request, "Failed to load payment history").await
    }

    /// `POST /payments/initiate`; creates the gateway order
    #[instrument(skip(self, payment), fields(booking_id = %payment.booking_id))]
    pub async fn initiate_payment(
        &self,
        payment: &InitiatePayment,
    ) -> Result<PaymentOrder, ApiError> {
        payment.validate()?;

        let request = ApiRequest::post("/payments/initiate").json(payment)?;
        let body = self.call(request, "Failed to initiate payment").await?;
        let order = PaymentOrder::from_response(body)?;
        info!(order_id = %order.order_id, amount = order.amount, "Payment initiated");
        Ok(order)
    }

    /// `POST /payments/verify`
    ///
    /// A `success: false` body is an error even with a 2xx status.
    #[instrument(skip(self, verification), fields(payment_id = %verification.payment_id))]
    pub async fn verify_payment(
        &self,
        verification: &VerifyPayment,
    ) -> Result<VerifyResponse, ApiError> {
        let request = ApiRequest::post("/payments/verify").json(verification)?;
        let response: VerifyResponse =
            self.call_as(request, "Payment verification failed").await?;
        info!(transaction_id = ?response.transaction_id, "Payment verified");
        Ok(response)
    }

    /// `POST /payments/{id}/refund`
    pub async fn request_refund(
        &self,
        payment_id: &str,
        reason: &str,
    ) -> Result<RefundResponse, ApiError> {
        let id = path_id("Payment", payment_id)?;
        let request = ApiRequest::post(format!("/payments/{id}/refund"))
            .json_value(json!({ "reason": reason }));
        self.call_as(request, "Refund request failed").await
    }
}

use async_trait::async_trait;
use wastewise_core::{BackendError, PaymentApi};
use wastewise_domain::constants::DEFAULT_PAGE_LIMIT;
use wastewise_domain::{
    BookingFilter, BookingPage, InitiatePayment, PaymentHistory, PaymentOrder, VerifyPayment,
    VerifyResponse,
};

use crate::api::{ApiError, WasteWiseClient};

impl From<ApiError> for BackendError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(message) => BackendError::auth(message),
            other => BackendError::new(other.to_string()),
        }
    }
}

#[async_trait]
impl PaymentApi for WasteWiseClient {
    async fn initiate(&self, request: &InitiatePayment) -> Result<PaymentOrder, BackendError> {
        Ok(self.initiate_payment(request).await?)
    }

    async fn verify(&self, request: &VerifyPayment) -> Result<VerifyResponse, BackendError> {
        Ok(self.verify_payment(request).await?)
    }

    async fn payment_history(&self) -> Result<PaymentHistory, BackendError> {
        Ok(WasteWiseClient::payment_history(self, DEFAULT_PAGE_LIMIT, 0).await?)
    }

    async fn bookings(&self) -> Result<BookingPage, BackendError> {
        Ok(self.list_bookings(&BookingFilter::default()).await?)
    }
}

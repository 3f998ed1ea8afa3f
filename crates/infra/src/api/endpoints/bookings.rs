use serde_json::json;
use tracing::{info, instrument};
use wastewise_domain::{
    Booking, BookingFilter, BookingPage, BookingTracking, CreateBooking, RatingRequest,
    RatingResponse, RescheduleRequest,
};

use crate::api::request::path_id;
use crate::api::{ApiError, ApiRequest, WasteWiseClient};

impl WasteWiseClient {
    /// `POST /bookings/create`; required fields are checked before sending
    #[instrument(skip(self, booking), fields(provider = %booking.service_provider_id))]
    pub async fn create_booking(&self, booking: &CreateBooking) -> Result<Booking, ApiError> {
        booking.validate()?;

        let request = ApiRequest::post("/bookings/create").json(booking)?;
        let created: Booking =
            self.call_field(request, "booking", "Failed to create booking").await?;
        info!(booking_id = %created.id, "Booking created");
        Ok(created)
    }

    pub async fn list_bookings(&self, filter: &BookingFilter) -> Result<BookingPage, ApiError> {
        let request = ApiRequest::get("/bookings/my-bookings").query(filter.to_query());
        self.call_as(request, "Failed to load bookings").await
    }

    pub async fn booking_details(&self, booking_id: &str) -> Result<Booking, ApiError> {
        let id = path_id("Booking", booking_id)?;
        let request = ApiRequest::get(format!("/bookings/{id}"));
        self.call_field(request, "booking", "Failed to load booking").await
    }

    pub async fn cancel_booking(
        &self,
        booking_id: &str,
        reason: &str,
    ) -> Result<Booking, ApiError> {
        let id = path_id("Booking", booking_id)?;
        let request = ApiRequest::post(format!("/bookings/{id}/cancel"))
            .json_value(json!({ "reason": reason }));
        self.call_field(request, "booking", "Failed to cancel booking").await
    }

    pub async fn reschedule_booking(
        &self,
        booking_id: &str,
        new_date: &str,
        new_time_slot: &str,
    ) -> Result<Booking, ApiError> {
        let body = RescheduleRequest {
            new_scheduled_date: new_date.to_string(),
            new_time_slot: new_time_slot.to_string(),
        };
        let id = path_id("Booking", booking_id)?;
        if body.new_scheduled_date.trim().is_empty() || body.new_time_slot.trim().is_empty() {
            return Err(ApiError::Validation("New date and time slot are required".to_string()));
        }

        let request = ApiRequest::post(format!("/bookings/{id}/reschedule")).json(&body)?;
        self.call_field(request, "booking", "Failed to reschedule booking").await
    }

    /// `POST /bookings/{id}/rate`; the response carries the points earned
    pub async fn rate_booking(
        &self,
        booking_id: &str,
        rating: &RatingRequest,
    ) -> Result<RatingResponse, ApiError> {
        let id = path_id("Booking", booking_id)?;
        rating.validate()?;

        let request = ApiRequest::post(format!("/bookings/{id}/rate")).json(rating)?;
        self.call_as(request, "Failed to rate booking").await
    }

    pub async fn track_booking(&self, booking_id: &str) -> Result<BookingTracking, ApiError> {
        let id = path_id("Booking", booking_id)?;
        let request = ApiRequest::get(format!("/bookings/{id}/track"));
        self.call_field(request, "tracking", "Failed to track booking").await
    }
}

//! Pickup bookings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_domain_status_conversions;
use crate::types::services::Pagination;
use crate::utils::require_fields;
use crate::utils::serde::id_string;
use crate::{Result, WasteWiseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WasteType {
    #[serde(rename = "plastic")]
    Plastic,
    #[serde(rename = "organic")]
    Organic,
    #[serde(rename = "paper")]
    Paper,
    #[serde(rename = "glass")]
    Glass,
    #[serde(rename = "metal")]
    Metal,
    #[serde(rename = "e-waste")]
    EWaste,
}

impl_domain_status_conversions!(WasteType {
    Plastic => "plastic",
    Organic => "organic",
    Paper => "paper",
    Glass => "glass",
    Metal => "metal",
    EWaste => "e-waste",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl_domain_status_conversions!(BookingStatus {
    Pending => "pending",
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

/// Body of `/bookings/create`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateBooking {
    pub service_provider_id: String,
    pub waste_type: WasteType,
    /// Free-form amount such as `"5 kg"`
    pub quantity: String,
    pub pickup_address: String,
    /// ISO-8601 date or datetime
    pub scheduled_date: String,
    pub scheduled_time_slot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl CreateBooking {
    /// # Errors
    /// Returns `WasteWiseError::Validation` listing every blank required field.
    pub fn validate(&self) -> Result<()> {
        require_fields(&[
            ("service_provider_id", &self.service_provider_id),
            ("quantity", &self.quantity),
            ("pickup_address", &self.pickup_address),
            ("scheduled_date", &self.scheduled_date),
            ("scheduled_time_slot", &self.scheduled_time_slot),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub waste_type: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub scheduled_time_slot: Option<String>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookingPage {
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl BookingFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RescheduleRequest {
    pub new_scheduled_date: String,
    pub new_time_slot: String,
}

/// Body of `/bookings/{id}/rate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRequest {
    pub rating: u8,
    pub title: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_quality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanliness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<u8>,
}

impl RatingRequest {
    pub fn new(rating: u8, title: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            rating,
            title: title.into(),
            comment: comment.into(),
            service_quality: None,
            punctuality: None,
            cleanliness: None,
            communication: None,
        }
    }

    /// # Errors
    /// Returns `WasteWiseError::Validation` when a score is outside 1..=5 or
    /// the title/comment is blank.
    pub fn validate(&self) -> Result<()> {
        require_fields(&[("title", &self.title), ("comment", &self.comment)])?;
        let scores = [
            Some(self.rating),
            self.service_quality,
            self.punctuality,
            self.cleanliness,
            self.communication,
        ];
        if scores.iter().flatten().any(|score| !(1..=5).contains(score)) {
            return Err(WasteWiseError::Validation("Ratings must be between 1 and 5".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RatingResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub points_earned: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookingTracking {
    #[serde(default)]
    pub current_status: Option<String>,
    #[serde(default)]
    pub estimated_arrival: Option<String>,
    #[serde(default)]
    pub live_location: Option<Value>,
    #[serde(default)]
    pub tracking_steps: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

//! Service provider discovery

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::serde::id_string;

/// Paging block shared by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProvider {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, alias = "business_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub specialities: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderPage {
    #[serde(default)]
    pub providers: Vec<ServiceProvider>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Filters for `/services/search`; unset filters are not sent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceSearch {
    pub waste_type: Option<String>,
    pub city: Option<String>,
    pub service_type: Option<String>,
    pub min_rating: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub sort_by: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ServiceSearch {
    pub fn near(lat: f64, lng: f64, radius_km: f64) -> Self {
        Self { lat: Some(lat), lng: Some(lng), radius_km: Some(radius_km), ..Self::default() }
    }

    #[must_use]
    pub fn with_waste_type(mut self, waste_type: impl Into<String>) -> Self {
        self.waste_type = Some(waste_type.into());
        self
    }

    /// Query pairs in a stable order
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                query.push((key, value));
            }
        };

        push("waste_type", self.waste_type.clone());
        push("city", self.city.clone());
        push("service_type", self.service_type.clone());
        push("min_rating", self.min_rating.map(|v| v.to_string()));
        push("lat", self.lat.map(|v| v.to_string()));
        push("lng", self.lng.map(|v| v.to_string()));
        push("radius", self.radius_km.map(|v| v.to_string()));
        push("sort_by", self.sort_by.clone());
        push("limit", self.limit.map(|v| v.to_string()));
        push("offset", self.offset.map(|v| v.to_string()));
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReviewPage {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub pagination: Pagination,
}

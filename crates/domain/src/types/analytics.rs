//! Analytics dashboards and exports
//!
//! Report bodies are rendered by the UI as-is, so they stay as JSON maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl_domain_status_conversions!(AnalyticsPeriod {
    Week => "week",
    Month => "month",
    Quarter => "quarter",
    Year => "year",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Pdf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    #[default]
    Personal,
    Community,
}

/// Body of `/analytics/export`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportRequest {
    #[serde(rename = "type")]
    pub scope: ExportScope,
    pub format: ExportFormat,
    pub period: AnalyticsPeriod,
    pub include_charts: bool,
}

/// Opaque analytics payload (dashboard, personal analytics, insights)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl AnalyticsReport {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

impl From<Map<String, Value>> for AnalyticsReport {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExportResponse {
    #[serde(default)]
    pub export: Option<Value>,
    #[serde(default)]
    pub download_info: Option<Value>,
}

use serde_json::{Map, Value};
use wastewise_domain::{AnalyticsPeriod, AnalyticsReport, ExportRequest, ExportResponse};

use crate::api::client::decode;
use crate::api::{ApiError, ApiRequest, WasteWiseClient};

impl WasteWiseClient {
    /// `GET /analytics/dashboard`; the statistics are top-level fields
    pub async fn dashboard(&self) -> Result<AnalyticsReport, ApiError> {
        let request = ApiRequest::get("/analytics/dashboard");
        let body = self.call(request, "Failed to load dashboard").await?;
        let mut data: Map<String, Value> = decode(body)?;
        data.remove("success");
        Ok(AnalyticsReport::from(data))
    }

    pub async fn personal_analytics(
        &self,
        period: AnalyticsPeriod,
    ) -> Result<AnalyticsReport, ApiError> {
        let request =
            ApiRequest::get("/analytics/personal").query([("period", period.to_string())]);
        self.call_field(request, "analytics", "Failed to load analytics").await
    }

    pub async fn insights(&self) -> Result<Vec<Value>, ApiError> {
        let request = ApiRequest::get("/analytics/insights");
        self.call_field(request, "insights", "Failed to load insights").await
    }

    pub async fn export_analytics(
        &self,
        export: &ExportRequest,
    ) -> Result<ExportResponse, ApiError> {
        let request = ApiRequest::post("/analytics/export").json(export)?;
        self.call_as(request, "Failed to export analytics").await
    }
}

use wastewise_domain::{ProviderPage, ReviewPage, ServiceProvider, ServiceSearch};

use crate::api::request::path_id;
use crate::api::{ApiError, ApiRequest, WasteWiseClient};

impl WasteWiseClient {
    /// `GET /services/search`; unset filters are omitted from the query
    pub async fn search_services(&self, search: &ServiceSearch) -> Result<ProviderPage, ApiError> {
        let request = ApiRequest::get("/services/search").query(search.to_query());
        self.call_as(request, "Failed to search service providers").await
    }

    pub async fn service_details(&self, provider_id: &str) -> Result<ServiceProvider, ApiError> {
        let id = path_id("Service provider", provider_id)?;
        let request = ApiRequest::get(format!("/services/{id}"));
        self.call_field(request, "provider", "Failed to load service provider").await
    }

    pub async fn service_reviews(
        &self,
        provider_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<ReviewPage, ApiError> {
        let id = path_id("Service provider", provider_id)?;
        let request = ApiRequest::get(format!("/services/{id}/reviews"))
            .query([("limit", limit.to_string()), ("offset", offset.to_string())]);
        self.call_as(request, "Failed to load reviews").await
    }
}

use std::time::Duration;

use tracing::debug;
use wastewise_domain::constants::HEALTH_CHECK_TIMEOUT_SECS;

use crate::api::{ApiRequest, WasteWiseClient};

impl WasteWiseClient {
    /// Check `GET /health`
    ///
    /// Never fails: any transport error or non-2xx status reports `false`.
    pub async fn health_check(&self) -> bool {
        let request = ApiRequest::get("/health")
            .unauthenticated()
            .timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS));

        match self.call(request, "Health check failed").await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Backend health check failed");
                false
            }
        }
    }
}

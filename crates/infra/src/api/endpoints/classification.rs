use tracing::{debug, instrument};
use wastewise_domain::{ClassificationResult, ImageUpload};

use crate::api::request::MultipartField;
use crate::api::{ApiError, ApiRequest, WasteWiseClient};

impl WasteWiseClient {
    /// Upload an image to the configured classification route
    ///
    /// Sent as multipart field `image`; the boundary header is generated by
    /// the transport. Both the nested `/classify` and the flat `/ai/predict`
    /// response shapes are accepted.
    #[instrument(skip(self, image), fields(file = %image.file_name, bytes = image.bytes.len()))]
    pub async fn classify_waste(
        &self,
        image: ImageUpload,
    ) -> Result<ClassificationResult, ApiError> {
        image.validate()?;

        let ImageUpload { file_name, content_type, bytes } = image;
        let request = ApiRequest::post(self.config().classify_path.clone()).multipart(vec![
            MultipartField::File { name: "image".to_string(), file_name, content_type, bytes },
        ]);

        let body = self.call(request, "Classification failed").await?;
        let result = ClassificationResult::from_response(body)?;
        debug!(
            waste_type = %result.classification.waste_type,
            confidence = result.classification.confidence,
            "Image classified"
        );
        Ok(result)
    }
}

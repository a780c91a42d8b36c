//! Image-generation service client.

use async_trait::async_trait;
use hokusai_core::{GenerateImageRequest, GenerateImageResponse};
use hokusai_error::{HokusaiResult, HttpError, ServiceError, ServiceErrorKind};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Turns a visual prompt into a single image.
///
/// Implementations must treat a non-2xx or malformed response as a service
/// error; the bounded wait is enforced by the caller, not the client.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for the given prompt and aspect ratio.
    async fn generate(&self, request: &GenerateImageRequest)
    -> HokusaiResult<GenerateImageResponse>;
}

/// HTTP client for the generation service's `/api/generate-image` endpoint.
#[derive(Debug, Clone)]
pub struct HttpImageClient {
    client: Client,
    base_url: String,
}

impl HttpImageClient {
    /// Creates a new image-generation client.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(url = %base_url, "Created image generation client");
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl ImageGenerator for HttpImageClient {
    #[instrument(skip(self, request), fields(prompt_len = request.prompt.len(), aspect_ratio = %request.aspect_ratio))]
    async fn generate(
        &self,
        request: &GenerateImageRequest,
    ) -> HokusaiResult<GenerateImageResponse> {
        let url = format!("{}/api/generate-image", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Generation request failed");
                HttpError::new(format!("generate-image: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Generation service error");
            return Err(ServiceError::new(ServiceErrorKind::Api {
                status_code: status.as_u16(),
                message: error_text,
            })
            .into());
        }

        let body: GenerateImageResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse generation response");
            ServiceError::new(ServiceErrorKind::MalformedResponse(e.to_string()))
        })?;

        if body.image_url.is_empty() {
            return Err(ServiceError::new(ServiceErrorKind::MissingField("image_url")).into());
        }

        debug!(url_len = body.image_url.len(), "Received generated image");
        Ok(body)
    }
}

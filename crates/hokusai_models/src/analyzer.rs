//! Text-analysis service client.

use async_trait::async_trait;
use hokusai_core::{AnalyzeRequest, StoryAnalysis};
use hokusai_error::{HokusaiResult, HttpError, ServiceError, ServiceErrorKind};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Turns raw narrative text into a structured storyboard breakdown.
///
/// Consumed as an opaque contract; the analysis algorithm itself lives
/// behind the service.
#[async_trait]
pub trait StoryAnalyzer: Send + Sync {
    /// Analyze a chapter of text into title, characters, and scenes.
    async fn analyze(&self, request: &AnalyzeRequest) -> HokusaiResult<StoryAnalysis>;
}

/// HTTP client for the analysis service's `/api/analyze` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    base_url: String,
}

impl HttpAnalysisClient {
    /// Creates a new analysis client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the analysis service, e.g. `http://localhost:8000`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(url = %base_url, "Created analysis client");
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl StoryAnalyzer for HttpAnalysisClient {
    #[instrument(skip(self, request), fields(text_len = request.text.len(), art_style = %request.art_style))]
    async fn analyze(&self, request: &AnalyzeRequest) -> HokusaiResult<StoryAnalysis> {
        let url = format!("{}/api/analyze", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Analysis request failed");
                HttpError::new(format!("analyze: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Analysis service error");
            return Err(ServiceError::new(ServiceErrorKind::Api {
                status_code: status.as_u16(),
                message: error_text,
            })
            .into());
        }

        let analysis: StoryAnalysis = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse analysis response");
            ServiceError::new(ServiceErrorKind::MalformedResponse(e.to_string()))
        })?;

        debug!(
            scenes = analysis.scenes.len(),
            panels = analysis.panel_count(),
            "Received analysis"
        );
        Ok(analysis)
    }
}

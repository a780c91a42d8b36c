//! Request and response types for the analysis and generation services.

use serde::{Deserialize, Serialize};

/// Default art style sent with analysis requests.
pub const DEFAULT_ART_STYLE: &str = "manhwa";

/// Default aspect ratio for generated panel art (vertical webtoon format).
pub const DEFAULT_ASPECT_RATIO: &str = "9:16";

/// Request to turn raw narrative text into a structured storyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub art_style: String,
}

impl AnalyzeRequest {
    /// Build a request with the default art style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            art_style: DEFAULT_ART_STYLE.to_string(),
        }
    }

    /// Override the art style.
    pub fn with_art_style(mut self, art_style: impl Into<String>) -> Self {
        self.art_style = art_style.into();
        self
    }
}

/// Request to turn a visual prompt into an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub aspect_ratio: String,
}

impl GenerateImageRequest {
    /// Build a request with the default aspect ratio.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }

    /// Override the aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }
}

/// Response from the image-generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateImageResponse {
    pub image_url: String,
}

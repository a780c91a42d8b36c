//! Core data types for the Hokusai storyboard engine.
//!
//! This crate provides the entity model and service contracts shared by the
//! store, persistence, and client crates.

mod analysis;
mod id;
mod panel;
mod request;

pub use analysis::{Character, Scene, ScenePanel, StoryAnalysis};
pub use id::{AnalysisId, PanelId, SessionId};
pub use panel::{Panel, PanelPatch};
pub use request::{
    AnalyzeRequest, DEFAULT_ART_STYLE, DEFAULT_ASPECT_RATIO, GenerateImageRequest,
    GenerateImageResponse,
};

//! Hokusai: panel state and generation coordination for a
//! story-to-storyboard studio.
//!
//! Narrative text goes in, an ordered sequence of illustrated panels comes
//! out, and the user curates that sequence while changes replicate to a
//! remote store. This crate is the facade: it re-exports the workspace
//! building blocks and adds the coordination layers, [`ReorderSync`] for
//! sequence-numbered optimistic order replication and
//! [`GenerationCoordinator`] for single-flight per-panel image generation,
//! plus the [`StudioSession`] workflow that ties them together.

mod config;
mod draft;
mod generation;
mod session;
mod sync;
mod telemetry;

pub use config::StudioConfig;
pub use draft::DraftState;
pub use generation::{GenerationCoordinator, GenerationEvent, GenerationOutcome};
pub use session::StudioSession;
pub use sync::{OrderSyncEvent, ReorderSync, SyncStatus};
pub use telemetry::init_telemetry;

pub use hokusai_core::{
    AnalysisId, AnalyzeRequest, Character, GenerateImageRequest, GenerateImageResponse, Panel,
    PanelId, PanelPatch, Scene, ScenePanel, SessionId, StoryAnalysis,
};
pub use hokusai_error::{HokusaiError, HokusaiResult, RetryableError};
pub use hokusai_models::{HttpAnalysisClient, HttpImageClient, ImageGenerator, StoryAnalyzer};
pub use hokusai_persistence::{InMemoryAdapter, PersistenceAdapter, RestAdapter};
pub use hokusai_store::{AnalysisIngester, PanelStore, SharedPanelStore, StoreEvent};

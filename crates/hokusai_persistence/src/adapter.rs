//! The persistence adapter contract.

use async_trait::async_trait;
use hokusai_core::{AnalysisId, Panel, PanelId, SessionId, StoryAnalysis};
use hokusai_error::HokusaiResult;

/// Durable storage of sessions, analyses, and panels.
///
/// Every operation may fail transiently; callers treat failures as
/// non-fatal and keep local state as the interim truth. Implementations
/// must honor two contracts:
///
/// - `fetch_panels` orders primarily by `display_order` and secondarily by
///   `created_at`, so rows with missing or duplicate order values still come
///   back in a stable order.
/// - `set_panel_order` applies a bulk order update only when `seq` exceeds
///   the last sequence applied for the session, and reports a stale write as
///   a [`hokusai_error::SyncConflictError`]. This keeps two overlapping sync
///   requests from regressing the stored order when they complete out of
///   network order.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Create a session from the raw input text, returning its id.
    async fn create_session(&self, input_text: &str) -> HokusaiResult<SessionId>;

    /// Save an analysis under a session.
    async fn save_analysis(
        &self,
        session: SessionId,
        analysis: &StoryAnalysis,
    ) -> HokusaiResult<AnalysisId>;

    /// Bulk-insert freshly ingested panels under a session and analysis.
    async fn insert_panels(
        &self,
        session: SessionId,
        analysis: AnalysisId,
        panels: &[Panel],
    ) -> HokusaiResult<()>;

    /// Fetch all panels for a session, ordered by rank then creation time.
    async fn fetch_panels(&self, session: SessionId) -> HokusaiResult<Vec<Panel>>;

    /// Record a generated image URL on a single panel.
    async fn update_panel_image(&self, id: PanelId, image_url: &str) -> HokusaiResult<()>;

    /// Delete a single panel. Deleting a missing panel is not an error.
    async fn delete_panel(&self, id: PanelId) -> HokusaiResult<()>;

    /// Bulk-update panel ranks for a reorder sync event.
    ///
    /// Idempotent and keyed by panel id: replaying the same `(seq, order)`
    /// pair or delivering it late is safe by construction.
    async fn set_panel_order(
        &self,
        session: SessionId,
        seq: u64,
        order: &[(PanelId, i32)],
    ) -> HokusaiResult<()>;
}

//! In-memory persistence adapter.
//!
//! Backs tests and offline operation; implements the same ordering and
//! sequence-guard contracts as the remote backend.

use crate::PersistenceAdapter;
use async_trait::async_trait;
use hokusai_core::{AnalysisId, Panel, PanelId, SessionId, StoryAnalysis};
use hokusai_error::{HokusaiResult, SyncConflictError};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<SessionId, String>,
    analyses: HashMap<AnalysisId, (SessionId, StoryAnalysis)>,
    panels: HashMap<PanelId, (SessionId, Panel)>,
    last_applied_seq: HashMap<SessionId, u64>,
}

/// HashMap-backed adapter with the full persistence contract.
#[derive(Debug, Default)]
pub struct InMemoryAdapter {
    inner: Mutex<Inner>,
}

impl InMemoryAdapter {
    /// Create an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored panels, across all sessions.
    pub fn panel_count(&self) -> usize {
        self.inner.lock().panels.len()
    }

    /// The last sequence number applied for a session, if any.
    pub fn last_applied_seq(&self, session: SessionId) -> Option<u64> {
        self.inner.lock().last_applied_seq.get(&session).copied()
    }
}

#[async_trait]
impl PersistenceAdapter for InMemoryAdapter {
    async fn create_session(&self, input_text: &str) -> HokusaiResult<SessionId> {
        let id = SessionId::new();
        self.inner.lock().sessions.insert(id, input_text.to_string());
        debug!(session = %id, "Created session");
        Ok(id)
    }

    async fn save_analysis(
        &self,
        session: SessionId,
        analysis: &StoryAnalysis,
    ) -> HokusaiResult<AnalysisId> {
        let id = AnalysisId::new();
        self.inner
            .lock()
            .analyses
            .insert(id, (session, analysis.clone()));
        Ok(id)
    }

    async fn insert_panels(
        &self,
        session: SessionId,
        _analysis: AnalysisId,
        panels: &[Panel],
    ) -> HokusaiResult<()> {
        let mut inner = self.inner.lock();
        for panel in panels {
            inner.panels.insert(*panel.id(), (session, panel.clone()));
        }
        Ok(())
    }

    async fn fetch_panels(&self, session: SessionId) -> HokusaiResult<Vec<Panel>> {
        let inner = self.inner.lock();
        let mut panels: Vec<Panel> = inner
            .panels
            .values()
            .filter(|(s, _)| *s == session)
            .map(|(_, p)| p.clone())
            .collect();
        panels.sort_by(|a, b| {
            a.display_order()
                .cmp(b.display_order())
                .then_with(|| a.created_at().cmp(b.created_at()))
        });
        Ok(panels)
    }

    async fn update_panel_image(&self, id: PanelId, image_url: &str) -> HokusaiResult<()> {
        let mut inner = self.inner.lock();
        if let Some((_, panel)) = inner.panels.get_mut(&id) {
            panel.apply(hokusai_core::PanelPatch::image(image_url));
        }
        Ok(())
    }

    async fn delete_panel(&self, id: PanelId) -> HokusaiResult<()> {
        self.inner.lock().panels.remove(&id);
        Ok(())
    }

    async fn set_panel_order(
        &self,
        session: SessionId,
        seq: u64,
        order: &[(PanelId, i32)],
    ) -> HokusaiResult<()> {
        let mut inner = self.inner.lock();
        let applied = inner.last_applied_seq.get(&session).copied().unwrap_or(0);
        if seq <= applied {
            debug!(session = %session, seq, applied, "Dropped stale order sync");
            return Err(SyncConflictError::new(session.to_string(), seq, applied).into());
        }
        inner.last_applied_seq.insert(session, seq);
        for (id, display_order) in order {
            // Ids deleted since the event was issued are skipped; the
            // upsert is keyed by id and tolerant of replays.
            if let Some((_, panel)) = inner.panels.get_mut(id) {
                panel.set_display_order(*display_order);
            }
        }
        Ok(())
    }
}

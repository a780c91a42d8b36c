//! One studio visit: analysis, curation, and resume flows.

use crate::{GenerationCoordinator, GenerationOutcome, ReorderSync, StudioConfig};
use hokusai_core::{AnalyzeRequest, PanelId, SessionId, StoryAnalysis};
use hokusai_error::{HokusaiResult, TimeoutError, ValidationError, ValidationErrorKind};
use hokusai_models::{ImageGenerator, StoryAnalyzer};
use hokusai_persistence::PersistenceAdapter;
use hokusai_store::{AnalysisIngester, PanelStore, SharedPanelStore};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// The single-session workflow over the panel core.
///
/// Owns the store, the generation coordinator, and the per-session reorder
/// sync. Local mutations are optimistic: backend replication is best-effort
/// and a replication failure never rolls back what the user sees.
pub struct StudioSession {
    store: SharedPanelStore,
    adapter: Arc<dyn PersistenceAdapter>,
    analyzer: Arc<dyn StoryAnalyzer>,
    coordinator: Arc<GenerationCoordinator>,
    sync: Mutex<Option<Arc<ReorderSync>>>,
    analysis: Mutex<Option<StoryAnalysis>>,
    art_style: String,
    analysis_timeout: Duration,
}

impl StudioSession {
    /// Assemble a session from its collaborators.
    pub fn new(
        config: &StudioConfig,
        adapter: Arc<dyn PersistenceAdapter>,
        analyzer: Arc<dyn StoryAnalyzer>,
        generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        let store = PanelStore::shared();
        let coordinator = Arc::new(GenerationCoordinator::new(
            store.clone(),
            adapter.clone(),
            generator,
            Duration::from_secs(*config.generation_timeout_secs()),
            config.aspect_ratio().clone(),
        ));
        Self {
            store,
            adapter,
            analyzer,
            coordinator,
            sync: Mutex::new(None),
            analysis: Mutex::new(None),
            art_style: config.art_style().clone(),
            analysis_timeout: Duration::from_secs(*config.analysis_timeout_secs()),
        }
    }

    /// The shared panel store, for subscribers and read access.
    pub fn store(&self) -> &SharedPanelStore {
        &self.store
    }

    /// The generation coordinator, for event subscription.
    pub fn coordinator(&self) -> &Arc<GenerationCoordinator> {
        &self.coordinator
    }

    /// The current session id, once established.
    pub fn session_id(&self) -> Option<SessionId> {
        self.sync.lock().as_ref().map(|s| s.session())
    }

    /// The current analysis, once one has run.
    pub fn analysis(&self) -> Option<StoryAnalysis> {
        self.analysis.lock().clone()
    }

    /// Analyze narrative text and replace the panel collection with the
    /// resulting storyboard.
    ///
    /// The local ingest is the source of truth; creating the remote
    /// session, saving the analysis, and bulk-inserting panels are
    /// best-effort afterwards. When the remote session cannot be created,
    /// reorder sync stays disabled until the next successful analysis.
    ///
    /// # Errors
    ///
    /// Empty input is a validation error; an analysis call that fails or
    /// exceeds its ceiling surfaces as a retryable error with local state
    /// untouched.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn analyze_and_ingest(&self, text: &str) -> HokusaiResult<StoryAnalysis> {
        if text.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyInput).into());
        }

        let request = AnalyzeRequest::new(text).with_art_style(self.art_style.clone());
        let mut analysis =
            match tokio::time::timeout(self.analysis_timeout, self.analyzer.analyze(&request))
                .await
            {
                Ok(result) => result?,
                Err(_) => {
                    return Err(TimeoutError::new(
                        "story analysis",
                        self.analysis_timeout.as_secs(),
                    )
                    .into());
                }
            };
        if analysis.title.is_none() {
            analysis.title = Some(analysis.title_or_default().to_string());
        }

        let panels = AnalysisIngester::ingest(&analysis);
        info!(panels = panels.len(), "Analysis complete");

        self.store.write().set_panels(panels.clone());
        *self.analysis.lock() = Some(analysis.clone());

        match self.adapter.create_session(text).await {
            Ok(session) => {
                *self.sync.lock() = Some(Arc::new(ReorderSync::new(self.adapter.clone(), session)));
                match self.adapter.save_analysis(session, &analysis).await {
                    Ok(analysis_id) => {
                        if let Err(e) =
                            self.adapter.insert_panels(session, analysis_id, &panels).await
                        {
                            warn!(error = %e, "Panel insert failed; panels exist locally only");
                        }
                    }
                    Err(e) => warn!(error = %e, "Analysis save failed"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Session create failed; running without backend sync");
            }
        }

        Ok(analysis)
    }

    /// Resume a previous session by loading its panels.
    ///
    /// Returns the number of panels loaded. The fetched order, already
    /// sorted by rank then creation time, becomes the in-memory order
    /// unchanged.
    #[instrument(skip(self), fields(session = %session))]
    pub async fn resume(&self, session: SessionId) -> HokusaiResult<usize> {
        let panels = self.adapter.fetch_panels(session).await?;
        let count = panels.len();
        self.store.write().set_panels(panels);
        *self.sync.lock() = Some(Arc::new(ReorderSync::new(self.adapter.clone(), session)));
        debug!(count, "Resumed session");
        Ok(count)
    }

    /// Move a panel and replicate the new order in the background.
    ///
    /// The local move is synchronous and immediately visible; the backend
    /// push runs on a spawned task and its failure leaves the local order
    /// as the user-visible truth.
    pub fn reorder(&self, from: usize, to: usize) -> HokusaiResult<()> {
        let order = {
            let mut store = self.store.write();
            store.reorder(from, to)?;
            store.order_snapshot()
        };

        if let Some(sync) = self.sync.lock().clone() {
            let event = sync.stamp(order);
            tokio::spawn(async move {
                // Errors are already logged and reflected in SyncStatus.
                let _ = sync.push(event).await;
            });
        }
        Ok(())
    }

    /// The reorder sync for the current session, if one is established.
    pub fn reorder_sync(&self) -> Option<Arc<ReorderSync>> {
        self.sync.lock().clone()
    }

    /// Delete a panel remotely, then locally.
    ///
    /// The remote delete goes first so a transient backend failure leaves
    /// both sides intact; the local delete never fails and absorbs a
    /// missing id.
    #[instrument(skip(self), fields(panel = %id))]
    pub async fn delete_panel(&self, id: PanelId) -> HokusaiResult<()> {
        self.adapter.delete_panel(id).await?;
        self.store.write().delete_panel(id);
        Ok(())
    }

    /// Generate art for a panel. See [`GenerationCoordinator::generate`].
    pub async fn generate_panel(
        &self,
        id: PanelId,
        regenerate: bool,
    ) -> HokusaiResult<GenerationOutcome> {
        self.coordinator.generate(id, regenerate).await
    }
}

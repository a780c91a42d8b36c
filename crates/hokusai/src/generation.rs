//! Per-panel image-generation lifecycle.
//!
//! The coordinator runs at most one generation per panel id at a time while
//! distinct panels generate concurrently. Nothing is forcibly cancelled:
//! every completion re-validates that its panel still exists and that no
//! newer result was applied before writing anything, which gives
//! cancellation-equivalent safety without cancellation.

use hokusai_core::{GenerateImageRequest, PanelId, PanelPatch};
use hokusai_error::{
    HokusaiResult, NotFoundError, RetryableError, TimeoutError, ValidationError,
    ValidationErrorKind,
};
use hokusai_models::ImageGenerator;
use hokusai_persistence::PersistenceAdapter;
use hokusai_store::SharedPanelStore;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Lifecycle notifications for one generation cycle.
///
/// Per panel the cycle is `Started` then exactly one of `Ready`, `Failed`,
/// or `Discarded`. A deleted panel is absorbing: its result is discarded
/// and no further event for that id is observable.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// Generation began for this panel
    Started(PanelId),
    /// Art was generated and applied
    Ready(PanelId),
    /// Generation failed; the panel is eligible for retry
    Failed {
        /// The panel whose generation failed
        panel: PanelId,
        /// Whether retrying is worthwhile
        retryable: bool,
    },
    /// A result arrived but the panel was gone or already superseded
    Discarded(PanelId),
}

/// What became of a completed generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The image URL was written to the store and backend
    Applied,
    /// The result was dropped by re-validation (panel deleted, or a newer
    /// image already present)
    Discarded,
}

/// Coordinates single-flight image generation per panel.
pub struct GenerationCoordinator {
    store: SharedPanelStore,
    adapter: Arc<dyn PersistenceAdapter>,
    generator: Arc<dyn ImageGenerator>,
    in_flight: Mutex<HashSet<PanelId>>,
    events: broadcast::Sender<GenerationEvent>,
    timeout: Duration,
    aspect_ratio: String,
}

impl GenerationCoordinator {
    /// Create a coordinator.
    ///
    /// `timeout` bounds one generation call; `aspect_ratio` is passed
    /// through to the service on every request.
    pub fn new(
        store: SharedPanelStore,
        adapter: Arc<dyn PersistenceAdapter>,
        generator: Arc<dyn ImageGenerator>,
        timeout: Duration,
        aspect_ratio: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            adapter,
            generator,
            in_flight: Mutex::new(HashSet::new()),
            events,
            timeout,
            aspect_ratio: aspect_ratio.into(),
        }
    }

    /// Subscribe to generation lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.events.subscribe()
    }

    /// Whether a generation is currently in flight for this panel.
    pub fn is_generating(&self, id: PanelId) -> bool {
        self.in_flight.lock().contains(&id)
    }

    /// Ids with a generation currently in flight.
    pub fn in_flight(&self) -> Vec<PanelId> {
        self.in_flight.lock().iter().copied().collect()
    }

    /// Run one generation cycle for a panel.
    ///
    /// Rejected without any network call when the prompt is empty, the
    /// panel is missing, a generation is already in flight for this id, or
    /// the panel already has art and `regenerate` was not given.
    ///
    /// # Errors
    ///
    /// Service, network, and timeout failures are surfaced as retryable;
    /// the in-flight marker is cleared on every exit path so the panel
    /// stays eligible for a future attempt.
    #[instrument(skip(self), fields(panel = %id, regenerate))]
    pub async fn generate(&self, id: PanelId, regenerate: bool) -> HokusaiResult<GenerationOutcome> {
        let prompt = {
            let store = self.store.read();
            let panel = store.get(id).ok_or_else(|| NotFoundError::panel(id))?;
            if panel.has_image() && !regenerate {
                return Err(ValidationError::new(ValidationErrorKind::ImageAlreadyPresent(
                    id.to_string(),
                ))
                .into());
            }
            panel.visual_prompt().clone()
        };
        if prompt.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyPrompt).into());
        }

        // Single-flight guard. Insertion and the duplicate check are one
        // atomic step under the lock.
        if !self.in_flight.lock().insert(id) {
            return Err(ValidationError::new(ValidationErrorKind::GenerationInFlight(
                id.to_string(),
            ))
            .into());
        }
        self.notify(GenerationEvent::Started(id));

        let result = self.run_cycle(id, &prompt, regenerate).await;

        // Clear the marker before reporting so a retry issued from the
        // failure handler is not spuriously rejected.
        self.in_flight.lock().remove(&id);

        match &result {
            Ok(GenerationOutcome::Applied) => self.notify(GenerationEvent::Ready(id)),
            Ok(GenerationOutcome::Discarded) => self.notify(GenerationEvent::Discarded(id)),
            Err(e) => self.notify(GenerationEvent::Failed {
                panel: id,
                retryable: e.is_retryable(),
            }),
        }
        result
    }

    async fn run_cycle(
        &self,
        id: PanelId,
        prompt: &str,
        regenerate: bool,
    ) -> HokusaiResult<GenerationOutcome> {
        let request =
            GenerateImageRequest::new(prompt).with_aspect_ratio(self.aspect_ratio.clone());

        let response = match tokio::time::timeout(self.timeout, self.generator.generate(&request))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(panel = %id, "Generation timed out");
                return Err(
                    TimeoutError::new("image generation", self.timeout.as_secs()).into(),
                );
            }
        };

        // Re-validate before applying: the panel may have been deleted
        // while we were suspended at the network boundary, or another
        // cycle's result may already be in place.
        let applied = {
            let mut store = self.store.write();
            match store.get(id) {
                None => {
                    debug!(panel = %id, "Panel deleted during generation; result discarded");
                    false
                }
                Some(panel) if panel.has_image() && !regenerate => {
                    debug!(panel = %id, "Newer result already applied; result discarded");
                    false
                }
                Some(_) => store.update_panel(id, PanelPatch::image(response.image_url.clone())),
            }
        };

        if !applied {
            return Ok(GenerationOutcome::Discarded);
        }

        info!(panel = %id, "Generated panel art");

        // Backend write is best-effort: the store already holds the truth
        // and a failure here must not fail the cycle.
        if let Err(e) = self
            .adapter
            .update_panel_image(id, &response.image_url)
            .await
        {
            warn!(panel = %id, error = %e, "Failed to persist image URL");
        }

        Ok(GenerationOutcome::Applied)
    }

    fn notify(&self, event: GenerationEvent) {
        let _ = self.events.send(event);
    }
}

//! The authoritative in-memory ordered panel collection.

use crate::StoreEvent;
use hokusai_core::{Panel, PanelId, PanelPatch};
use hokusai_error::{HokusaiResult, ValidationError, ValidationErrorKind};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the change-notification channel. Lagging subscribers drop
/// the oldest events and re-read the store, so a modest buffer suffices.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Single source of truth for the ordered panel collection.
///
/// Every mutation is synchronous and atomic: subscribers never observe a
/// partially-applied state. Replacement and reorder leave `display_order`
/// exactly the permutation `0..N-1` matching in-memory position; a delete
/// keeps the survivors' ranks until an explicit renumbering.
///
/// Mutations targeting a missing id are absorbed as no-ops so that
/// late-arriving async completions (a generation finishing after its panel
/// was deleted) cannot resurrect state.
#[derive(Debug)]
pub struct PanelStore {
    panels: Vec<Panel>,
    events: broadcast::Sender<StoreEvent>,
}

/// Shared handle to a panel store.
///
/// Mutations run synchronously under the lock and cannot interleave; async
/// collaborators hold the lock only across a single mutation, never across
/// an await point.
pub type SharedPanelStore = Arc<parking_lot::RwLock<PanelStore>>;

impl PanelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            panels: Vec::new(),
            events,
        }
    }

    /// Create an empty store behind a shared handle.
    pub fn shared() -> SharedPanelStore {
        Arc::new(parking_lot::RwLock::new(Self::new()))
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current collection in display order.
    pub fn panels(&self) -> Vec<Panel> {
        self.panels.clone()
    }

    /// Look up a panel by id.
    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| *p.id() == id)
    }

    /// Number of panels.
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Replace the entire collection, trusting the caller's order.
    ///
    /// Used on ingestion and on session resume. Ranks are renumbered so the
    /// dense-permutation invariant holds even if the incoming list carried
    /// gaps or duplicates.
    pub fn set_panels(&mut self, panels: Vec<Panel>) {
        self.panels = panels;
        self.renumber();
        let count = self.panels.len();
        debug!(count, "Replaced panel collection");
        self.notify(StoreEvent::Replaced { count });
    }

    /// Append a panel; its rank becomes the new length minus one.
    pub fn add_panel(&mut self, mut panel: Panel) {
        panel.set_display_order(self.panels.len() as i32);
        let id = *panel.id();
        self.panels.push(panel);
        self.notify(StoreEvent::Added(id));
    }

    /// Merge a partial update into the matching panel.
    ///
    /// Returns true if the patch was applied, false if the id is absent
    /// (idempotent against stale completions).
    pub fn update_panel(&mut self, id: PanelId, patch: PanelPatch) -> bool {
        match self.panels.iter_mut().find(|p| *p.id() == id) {
            Some(panel) => {
                panel.apply(patch);
                self.notify(StoreEvent::Updated(id));
                true
            }
            None => {
                debug!(%id, "Update targeted a missing panel, absorbed");
                false
            }
        }
    }

    /// Remove the matching panel if present; no-op otherwise.
    ///
    /// Survivors keep their ranks: renumbering is a reorder-equivalent
    /// operation performed explicitly, and the rank-then-creation-time
    /// fetch order tolerates the gap meanwhile.
    pub fn delete_panel(&mut self, id: PanelId) -> bool {
        let before = self.panels.len();
        self.panels.retain(|p| *p.id() != id);
        if self.panels.len() < before {
            self.notify(StoreEvent::Deleted(id));
            true
        } else {
            false
        }
    }

    /// Move the panel at `from` to position `to`, preserving the relative
    /// order of every other panel, then recompute all ranks.
    ///
    /// # Errors
    ///
    /// Returns a validation error when either index is out of range. A move
    /// to the panel's current position is an Ok no-op.
    pub fn reorder(&mut self, from: usize, to: usize) -> HokusaiResult<()> {
        let len = self.panels.len();
        if from >= len {
            return Err(ValidationError::new(ValidationErrorKind::IndexOutOfRange {
                index: from,
                len,
            })
            .into());
        }
        if to >= len {
            return Err(ValidationError::new(ValidationErrorKind::IndexOutOfRange {
                index: to,
                len,
            })
            .into());
        }
        if from == to {
            return Ok(());
        }

        let panel = self.panels.remove(from);
        self.panels.insert(to, panel);
        self.renumber();
        debug!(from, to, "Reordered panels");
        self.notify(StoreEvent::Reordered { from, to });
        Ok(())
    }

    /// Current `(id, rank)` pairs, the payload a reorder sync replicates.
    pub fn order_snapshot(&self) -> Vec<(PanelId, i32)> {
        self.panels
            .iter()
            .map(|p| (*p.id(), *p.display_order()))
            .collect()
    }

    fn renumber(&mut self) {
        for (index, panel) in self.panels.iter_mut().enumerate() {
            panel.set_display_order(index as i32);
        }
    }

    fn notify(&self, event: StoreEvent) {
        // send errors only when no subscriber exists, which is normal for
        // headless tests and early startup.
        let _ = self.events.send(event);
    }
}

impl Default for PanelStore {
    fn default() -> Self {
        Self::new()
    }
}

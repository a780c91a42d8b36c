//! Change notifications emitted by the panel store.

use hokusai_core::PanelId;

/// A completed store mutation, broadcast to subscribers.
///
/// Observers (presentation layers, sync workers) re-render or react on any
/// event; the payload identifies what changed, not the new state. Read the
/// store for the state.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The whole collection was replaced (ingestion or session resume)
    Replaced {
        /// New collection size
        count: usize,
    },
    /// A panel was appended
    Added(PanelId),
    /// A panel's mutable fields changed
    Updated(PanelId),
    /// A panel was removed
    Deleted(PanelId),
    /// A panel moved and every rank was recomputed
    Reordered {
        /// Original position of the moved panel
        from: usize,
        /// New position of the moved panel
        to: usize,
    },
}

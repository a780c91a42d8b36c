//! Panel state for the Hokusai storyboard engine.
//!
//! [`PanelStore`] owns the ordered panel collection and is the only place it
//! mutates; [`AnalysisIngester`] turns an analysis result into that
//! collection's initial contents. Observers subscribe to [`StoreEvent`]s
//! rather than being woven into the mutation path.

mod event;
mod ingest;
mod store;

pub use event::StoreEvent;
pub use ingest::AnalysisIngester;
pub use store::{PanelStore, SharedPanelStore};

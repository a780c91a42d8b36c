//! Conversion of an analysis result into an ordered panel list.

use hokusai_core::{Panel, StoryAnalysis};
use tracing::{debug, instrument};

/// Flattens a story analysis into newly-created panels.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisIngester;

impl AnalysisIngester {
    /// Flatten scenes in the order given, and panels within each scene in
    /// the order given, assigning a running 0-based rank and a fresh id per
    /// panel.
    ///
    /// The given order is authoritative: source indices may legitimately be
    /// non-monotonic and are never used for sorting. An empty scene list
    /// yields an empty panel list, not an error.
    #[instrument(skip(analysis), fields(scenes = analysis.scenes.len()))]
    pub fn ingest(analysis: &StoryAnalysis) -> Vec<Panel> {
        let mut panels = Vec::with_capacity(analysis.panel_count());
        let mut display_order = 0i32;

        for scene in &analysis.scenes {
            for scene_panel in &scene.panels {
                panels.push(Panel::new(
                    scene.scene_index,
                    scene_panel.panel_index,
                    scene_panel.narrative_description.clone(),
                    scene_panel.visual_prompt.clone(),
                    display_order,
                ));
                display_order += 1;
            }
        }

        debug!(panel_count = panels.len(), "Ingested analysis");
        panels
    }
}

//! The panel entity: one illustrated unit of the story.

use crate::PanelId;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One illustrated story unit.
///
/// Provenance fields (`scene_index`, `panel_index`) and the text fields are
/// immutable after creation. `image_url` transitions from `None` to `Some`
/// once per successful generation cycle. `display_order` is the panel's
/// rank within the owning store; only the store recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Panel {
    id: PanelId,
    scene_index: i32,
    panel_index: i32,
    narrative_description: String,
    visual_prompt: String,
    image_url: Option<String>,
    display_order: i32,
    created_at: DateTime<Utc>,
}

impl Panel {
    /// Create a fresh panel with no image, minting a new id.
    pub fn new(
        scene_index: i32,
        panel_index: i32,
        narrative_description: impl Into<String>,
        visual_prompt: impl Into<String>,
        display_order: i32,
    ) -> Self {
        Self {
            id: PanelId::new(),
            scene_index,
            panel_index,
            narrative_description: narrative_description.into(),
            visual_prompt: visual_prompt.into(),
            image_url: None,
            display_order,
            created_at: Utc::now(),
        }
    }

    /// Reconstruct a panel loaded from durable storage.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: PanelId,
        scene_index: i32,
        panel_index: i32,
        narrative_description: String,
        visual_prompt: String,
        image_url: Option<String>,
        display_order: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            scene_index,
            panel_index,
            narrative_description,
            visual_prompt,
            image_url,
            display_order,
            created_at,
        }
    }

    /// Merge a partial update into this panel.
    pub fn apply(&mut self, patch: PanelPatch) {
        if let Some(url) = patch.image_url {
            self.image_url = Some(url);
        }
        if let Some(order) = patch.display_order {
            self.display_order = order;
        }
    }

    /// Set the panel's rank. Reserved for the owning store.
    pub fn set_display_order(&mut self, order: i32) {
        self.display_order = order;
    }

    /// Whether art has been generated for this panel.
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}

/// Partial panel update, merged by `PanelStore::update_panel`.
///
/// Only fields that are legitimately mutable after creation appear here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelPatch {
    /// New image URL from a completed generation
    pub image_url: Option<String>,
    /// New rank from an explicit renumbering
    pub display_order: Option<i32>,
}

impl PanelPatch {
    /// Patch setting only the image URL.
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Patch setting only the display order.
    pub fn order(order: i32) -> Self {
        Self {
            display_order: Some(order),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_panel_has_no_image() {
        let panel = Panel::new(0, 0, "A hero appears.", "hero, rain, neon", 0);
        assert!(!panel.has_image());
        assert_eq!(*panel.display_order(), 0);
    }

    #[test]
    fn apply_merges_only_given_fields() {
        let mut panel = Panel::new(0, 1, "desc", "prompt", 3);
        panel.apply(PanelPatch::image("https://img/1.png"));
        assert_eq!(panel.image_url().as_deref(), Some("https://img/1.png"));
        assert_eq!(*panel.display_order(), 3);

        panel.apply(PanelPatch::order(1));
        assert_eq!(*panel.display_order(), 1);
        assert_eq!(panel.image_url().as_deref(), Some("https://img/1.png"));
    }
}

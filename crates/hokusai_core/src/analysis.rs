//! Story analysis types returned by the text-analysis service.
//!
//! These are read-only input to ingestion; the core never mutates them. The
//! given scene and panel order is authoritative even when the numeric
//! indices are non-monotonic.

use serde::{Deserialize, Serialize};

/// A character identified by the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    /// Physical appearance, when the analysis provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
}

/// One panel within a scene breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePanel {
    pub panel_index: i32,
    pub narrative_description: String,
    pub visual_prompt: String,
    /// What the image generator should avoid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_angle: Option<String>,
}

/// One scene with its ordered panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub scene_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    pub panels: Vec<ScenePanel>,
}

/// Structured storyboard breakdown of a chapter of narrative text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StoryAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl StoryAnalysis {
    /// Total panel count across all scenes.
    pub fn panel_count(&self) -> usize {
        self.scenes.iter().map(|s| s.panels.len()).sum()
    }

    /// Title with the fallback the studio shows for untitled stories.
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Story")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_service_response() {
        let json = r#"{
            "title": "The Neon Bar",
            "characters": [{"name": "Kael"}],
            "scenes": [{
                "scene_index": 0,
                "panels": [{
                    "panel_index": 0,
                    "narrative_description": "Kael enters the bar.",
                    "visual_prompt": "man entering neon-lit bar, rain"
                }]
            }]
        }"#;
        let analysis: StoryAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.panel_count(), 1);
        assert_eq!(analysis.characters[0].name, "Kael");
        assert!(analysis.characters[0].visual_description.is_none());
    }

    #[test]
    fn missing_title_gets_default() {
        let analysis = StoryAnalysis::default();
        assert_eq!(analysis.title_or_default(), "Untitled Story");
    }
}

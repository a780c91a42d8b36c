//! End-to-end workflow tests over the session facade.

use async_trait::async_trait;
use hokusai::{
    AnalyzeRequest, GenerateImageRequest, GenerateImageResponse, GenerationOutcome, HokusaiError,
    HokusaiResult, ImageGenerator, InMemoryAdapter, Panel, PersistenceAdapter, Scene, ScenePanel,
    StoryAnalysis, StoryAnalyzer, StudioConfig, StudioSession, SyncStatus,
};
use std::sync::Arc;
use std::time::Duration;

struct FixedAnalyzer {
    analysis: StoryAnalysis,
}

#[async_trait]
impl StoryAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _request: &AnalyzeRequest) -> HokusaiResult<StoryAnalysis> {
        Ok(self.analysis.clone())
    }
}

struct SlowAnalyzer;

#[async_trait]
impl StoryAnalyzer for SlowAnalyzer {
    async fn analyze(&self, _request: &AnalyzeRequest) -> HokusaiResult<StoryAnalysis> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!("analysis ceiling should fire first")
    }
}

struct EchoGenerator;

#[async_trait]
impl ImageGenerator for EchoGenerator {
    async fn generate(
        &self,
        request: &GenerateImageRequest,
    ) -> HokusaiResult<GenerateImageResponse> {
        Ok(GenerateImageResponse {
            image_url: format!("https://img/{}.png", request.prompt.len()),
        })
    }
}

fn scene_panel(panel_index: i32, beat: &str) -> ScenePanel {
    ScenePanel {
        panel_index,
        narrative_description: beat.to_string(),
        visual_prompt: format!("art of {}", beat),
        negative_prompt: None,
        camera_angle: None,
    }
}

fn two_scene_analysis() -> StoryAnalysis {
    StoryAnalysis {
        title: None,
        characters: Vec::new(),
        scenes: vec![
            Scene {
                scene_index: 0,
                location: Some("bar".to_string()),
                mood: None,
                panels: vec![scene_panel(0, "arrival"), scene_panel(1, "greeting")],
            },
            Scene {
                scene_index: 1,
                location: None,
                mood: Some("tense".to_string()),
                panels: vec![scene_panel(0, "standoff")],
            },
        ],
    }
}

fn config(timeout_secs: u64) -> StudioConfig {
    StudioConfig::builder()
        .service_url("http://localhost:8000")
        .backend_url("http://localhost:54321")
        .backend_api_key("key")
        .analysis_timeout_secs(timeout_secs)
        .build()
}

fn session_with(
    analyzer: Arc<dyn StoryAnalyzer>,
    timeout_secs: u64,
) -> (StudioSession, Arc<InMemoryAdapter>) {
    let adapter = Arc::new(InMemoryAdapter::new());
    let session = StudioSession::new(
        &config(timeout_secs),
        adapter.clone(),
        analyzer,
        Arc::new(EchoGenerator),
    );
    (session, adapter)
}

#[tokio::test]
async fn analyze_replaces_the_collection_and_replicates() {
    let (session, adapter) = session_with(
        Arc::new(FixedAnalyzer {
            analysis: two_scene_analysis(),
        }),
        60,
    );

    let analysis = session.analyze_and_ingest("A story about a bar.").await.unwrap();
    assert_eq!(analysis.title.as_deref(), Some("Untitled Story"));

    // Scenes flattened in order, display_order dense from zero.
    let store = session.store().read();
    assert_eq!(store.len(), 3);
    let orders: Vec<i32> = store.panels().iter().map(|p| *p.display_order()).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(store.panels()[2].narrative_description(), "standoff");
    drop(store);

    // Replicated and resumable.
    assert_eq!(adapter.panel_count(), 3);
    assert!(session.session_id().is_some());
    assert_eq!(session.analysis().unwrap().panel_count(), 3);
}

#[tokio::test]
async fn empty_input_is_rejected_before_analysis() {
    let (session, adapter) = session_with(Arc::new(SlowAnalyzer), 60);

    let result = session.analyze_and_ingest("   \n  ").await;
    assert!(matches!(result, Err(HokusaiError::Validation(_))));
    assert!(session.store().read().is_empty());
    assert_eq!(adapter.panel_count(), 0);
}

#[tokio::test]
async fn analysis_past_its_ceiling_leaves_state_untouched() {
    let (session, adapter) = session_with(Arc::new(SlowAnalyzer), 1);

    let result = session.analyze_and_ingest("A story.").await;
    assert!(matches!(result, Err(HokusaiError::Timeout(_))));
    assert!(session.store().read().is_empty());
    assert_eq!(adapter.panel_count(), 0);
    assert!(session.session_id().is_none());
}

#[tokio::test]
async fn resume_restores_the_persisted_order() {
    let analyzer = Arc::new(FixedAnalyzer {
        analysis: two_scene_analysis(),
    });
    let (session, adapter) = session_with(analyzer.clone(), 60);
    session.analyze_and_ingest("A story.").await.unwrap();
    let id = session.session_id().unwrap();
    let ids: Vec<_> = session.store().read().panels().iter().map(|p| *p.id()).collect();

    // A fresh session against the same backend sees the same storyboard.
    let revisit = StudioSession::new(
        &config(60),
        adapter,
        analyzer,
        Arc::new(EchoGenerator),
    );
    let count = revisit.resume(id).await.unwrap();
    assert_eq!(count, 3);
    let restored: Vec<_> = revisit.store().read().panels().iter().map(|p| *p.id()).collect();
    assert_eq!(restored, ids);
}

#[tokio::test]
async fn reorder_is_visible_immediately_and_replicated_eventually() {
    let (session, adapter) = session_with(
        Arc::new(FixedAnalyzer {
            analysis: two_scene_analysis(),
        }),
        60,
    );
    session.analyze_and_ingest("A story.").await.unwrap();
    let id = session.session_id().unwrap();
    let before: Vec<_> = session.store().read().panels().iter().map(|p| *p.id()).collect();

    session.reorder(0, 2).unwrap();

    // Local move is synchronous.
    let after: Vec<_> = session.store().read().panels().iter().map(|p| *p.id()).collect();
    assert_eq!(after, vec![before[1], before[2], before[0]]);

    // Background push lands with the first sequence number.
    let mut status = session.reorder_sync().unwrap().subscribe_status();
    while !matches!(*status.borrow(), SyncStatus::Saved { .. }) {
        status.changed().await.unwrap();
    }
    assert_eq!(adapter.last_applied_seq(id), Some(1));
    let fetched: Vec<_> = adapter.fetch_panels(id).await.unwrap().iter().map(|p| *p.id()).collect();
    assert_eq!(fetched, after);
}

#[tokio::test]
async fn delete_removes_both_sides_and_ends_generation_eligibility() {
    let (session, adapter) = session_with(
        Arc::new(FixedAnalyzer {
            analysis: two_scene_analysis(),
        }),
        60,
    );
    session.analyze_and_ingest("A story.").await.unwrap();
    let id = *session.store().read().panels()[0].id();

    session.delete_panel(id).await.unwrap();
    assert_eq!(session.store().read().len(), 2);
    assert_eq!(adapter.panel_count(), 2);

    let result = session.generate_panel(id, false).await;
    assert!(matches!(result, Err(HokusaiError::NotFound(_))));
}

#[tokio::test]
async fn generate_writes_art_through_the_facade() {
    let (session, adapter) = session_with(
        Arc::new(FixedAnalyzer {
            analysis: two_scene_analysis(),
        }),
        60,
    );
    session.analyze_and_ingest("A story.").await.unwrap();
    let backend = session.session_id().unwrap();
    let id = *session.store().read().panels()[0].id();

    let outcome = session.generate_panel(id, false).await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Applied);
    assert!(session.store().read().get(id).unwrap().has_image());

    let fetched = adapter.fetch_panels(backend).await.unwrap();
    let panel: &Panel = fetched.iter().find(|p| *p.id() == id).unwrap();
    assert!(panel.image_url().is_some());
}

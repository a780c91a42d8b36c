//! Tests for the in-memory persistence adapter.

use hokusai_core::{Panel, PanelId, StoryAnalysis};
use hokusai_error::HokusaiError;
use hokusai_persistence::{InMemoryAdapter, PersistenceAdapter};

fn test_panel(n: i32) -> Panel {
    Panel::new(0, n, format!("beat {}", n), format!("prompt {}", n), n)
}

async fn seeded(adapter: &InMemoryAdapter, count: i32) -> (hokusai_core::SessionId, Vec<Panel>) {
    let session = adapter.create_session("chapter text").await.unwrap();
    let analysis = adapter
        .save_analysis(session, &StoryAnalysis::default())
        .await
        .unwrap();
    let panels: Vec<Panel> = (0..count).map(test_panel).collect();
    adapter.insert_panels(session, analysis, &panels).await.unwrap();
    (session, panels)
}

#[tokio::test]
async fn insert_and_fetch_round_trip() {
    let adapter = InMemoryAdapter::new();
    let (session, panels) = seeded(&adapter, 3).await;

    let fetched = adapter.fetch_panels(session).await.unwrap();
    assert_eq!(fetched.len(), 3);
    let ids: Vec<PanelId> = fetched.iter().map(|p| *p.id()).collect();
    let expected: Vec<PanelId> = panels.iter().map(|p| *p.id()).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn fetch_orders_by_rank_then_creation_time() {
    let adapter = InMemoryAdapter::new();
    let session = adapter.create_session("text").await.unwrap();
    let analysis = adapter
        .save_analysis(session, &StoryAnalysis::default())
        .await
        .unwrap();

    // Two panels sharing a rank; the earlier-created one must come first.
    let first = test_panel(0);
    let mut second = test_panel(1);
    second.set_display_order(0);
    adapter
        .insert_panels(session, analysis, &[second.clone(), first.clone()])
        .await
        .unwrap();

    let fetched = adapter.fetch_panels(session).await.unwrap();
    assert_eq!(fetched[0].id(), first.id());
    assert_eq!(fetched[1].id(), second.id());
}

#[tokio::test]
async fn fetch_is_scoped_to_the_session() {
    let adapter = InMemoryAdapter::new();
    let (session_a, _) = seeded(&adapter, 2).await;
    let (_session_b, _) = seeded(&adapter, 3).await;

    let fetched = adapter.fetch_panels(session_a).await.unwrap();
    assert_eq!(fetched.len(), 2);
}

#[tokio::test]
async fn update_image_persists() {
    let adapter = InMemoryAdapter::new();
    let (session, panels) = seeded(&adapter, 1).await;
    let id = *panels[0].id();

    adapter
        .update_panel_image(id, "https://img/0.png")
        .await
        .unwrap();

    let fetched = adapter.fetch_panels(session).await.unwrap();
    assert_eq!(fetched[0].image_url().as_deref(), Some("https://img/0.png"));
}

#[tokio::test]
async fn delete_missing_panel_is_not_an_error() {
    let adapter = InMemoryAdapter::new();
    adapter.delete_panel(PanelId::new()).await.unwrap();
}

#[tokio::test]
async fn order_sync_applies_increasing_sequences() {
    let adapter = InMemoryAdapter::new();
    let (session, panels) = seeded(&adapter, 3).await;

    let reversed: Vec<(PanelId, i32)> = panels
        .iter()
        .rev()
        .enumerate()
        .map(|(rank, p)| (*p.id(), rank as i32))
        .collect();
    adapter.set_panel_order(session, 1, &reversed).await.unwrap();

    let fetched = adapter.fetch_panels(session).await.unwrap();
    assert_eq!(fetched[0].id(), panels[2].id());
    assert_eq!(adapter.last_applied_seq(session), Some(1));
}

#[tokio::test]
async fn stale_order_sync_is_dropped() {
    // Two sync requests complete out of network order; only the higher
    // sequence number may stick.
    let adapter = InMemoryAdapter::new();
    let (session, panels) = seeded(&adapter, 2).await;
    let a = *panels[0].id();
    let b = *panels[1].id();

    // seq 2 lands first.
    adapter
        .set_panel_order(session, 2, &[(b, 0), (a, 1)])
        .await
        .unwrap();

    // seq 1 arrives late and must be rejected without effect.
    let err = adapter
        .set_panel_order(session, 1, &[(a, 0), (b, 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, HokusaiError::SyncConflict(_)));

    let fetched = adapter.fetch_panels(session).await.unwrap();
    assert_eq!(fetched[0].id(), &b);
    assert_eq!(adapter.last_applied_seq(session), Some(2));
}

#[tokio::test]
async fn order_sync_skips_deleted_ids() {
    let adapter = InMemoryAdapter::new();
    let (session, panels) = seeded(&adapter, 2).await;
    let a = *panels[0].id();
    let b = *panels[1].id();

    adapter.delete_panel(a).await.unwrap();
    adapter
        .set_panel_order(session, 1, &[(a, 1), (b, 0)])
        .await
        .unwrap();

    let fetched = adapter.fetch_panels(session).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id(), &b);
    assert_eq!(*fetched[0].display_order(), 0);
}

//! Tests for sequence-numbered reorder replication.

use async_trait::async_trait;
use hokusai::{
    HokusaiError, HokusaiResult, InMemoryAdapter, OrderSyncEvent, Panel, PanelId,
    PersistenceAdapter, ReorderSync, StoryAnalysis, SyncStatus,
};
use hokusai_core::{AnalysisId, SessionId};
use hokusai_error::{ServiceError, ServiceErrorKind};
use std::sync::Arc;

/// Adapter whose order pushes always fail with a retryable service error.
struct FlakyAdapter {
    inner: InMemoryAdapter,
}

#[async_trait]
impl PersistenceAdapter for FlakyAdapter {
    async fn create_session(&self, input_text: &str) -> HokusaiResult<SessionId> {
        self.inner.create_session(input_text).await
    }

    async fn save_analysis(
        &self,
        session: SessionId,
        analysis: &StoryAnalysis,
    ) -> HokusaiResult<AnalysisId> {
        self.inner.save_analysis(session, analysis).await
    }

    async fn insert_panels(
        &self,
        session: SessionId,
        analysis: AnalysisId,
        panels: &[Panel],
    ) -> HokusaiResult<()> {
        self.inner.insert_panels(session, analysis, panels).await
    }

    async fn fetch_panels(&self, session: SessionId) -> HokusaiResult<Vec<Panel>> {
        self.inner.fetch_panels(session).await
    }

    async fn update_panel_image(&self, id: PanelId, image_url: &str) -> HokusaiResult<()> {
        self.inner.update_panel_image(id, image_url).await
    }

    async fn delete_panel(&self, id: PanelId) -> HokusaiResult<()> {
        self.inner.delete_panel(id).await
    }

    async fn set_panel_order(
        &self,
        _session: SessionId,
        _seq: u64,
        _order: &[(PanelId, i32)],
    ) -> HokusaiResult<()> {
        Err(ServiceError::new(ServiceErrorKind::Api {
            status_code: 503,
            message: "unavailable".to_string(),
        })
        .into())
    }
}

async fn seeded_session(adapter: &InMemoryAdapter, count: i32) -> (SessionId, Vec<Panel>) {
    let session = adapter.create_session("text").await.unwrap();
    let analysis = adapter
        .save_analysis(session, &StoryAnalysis::default())
        .await
        .unwrap();
    let panels: Vec<Panel> = (0..count)
        .map(|n| Panel::new(0, n, format!("beat {}", n), format!("prompt {}", n), n))
        .collect();
    adapter.insert_panels(session, analysis, &panels).await.unwrap();
    (session, panels)
}

#[tokio::test]
async fn push_applies_order_and_reports_saved() {
    let adapter = Arc::new(InMemoryAdapter::new());
    let (session, panels) = seeded_session(&adapter, 3).await;
    let sync = ReorderSync::new(adapter.clone(), session);
    let mut status = sync.subscribe_status();
    assert_eq!(*status.borrow(), SyncStatus::Idle);

    // Reverse the order.
    let order: Vec<_> = panels
        .iter()
        .rev()
        .enumerate()
        .map(|(rank, p)| (*p.id(), rank as i32))
        .collect();
    sync.push_order(order).await.unwrap();

    assert_eq!(adapter.last_applied_seq(session), Some(1));
    let fetched = adapter.fetch_panels(session).await.unwrap();
    let ids: Vec<_> = fetched.iter().map(|p| *p.id()).collect();
    let expected: Vec<_> = panels.iter().rev().map(|p| *p.id()).collect();
    assert_eq!(ids, expected);

    status.changed().await.unwrap();
    assert_eq!(*status.borrow(), SyncStatus::Saved { seq: 1 });
}

#[tokio::test]
async fn stale_event_is_dropped_without_regressing_the_order() {
    let adapter = Arc::new(InMemoryAdapter::new());
    let (session, panels) = seeded_session(&adapter, 2).await;
    let sync = ReorderSync::new(adapter.clone(), session);

    let first = sync.stamp(vec![(*panels[0].id(), 1), (*panels[1].id(), 0)]);
    let second = sync.stamp(vec![(*panels[0].id(), 0), (*panels[1].id(), 1)]);
    assert!(first.seq < second.seq);

    // The newer event lands first; the older one must be refused.
    sync.push(second).await.unwrap();
    let stale = sync.push(first).await;
    assert!(matches!(stale, Err(HokusaiError::SyncConflict(_))));

    assert_eq!(adapter.last_applied_seq(session), Some(2));
    let fetched = adapter.fetch_panels(session).await.unwrap();
    assert_eq!(*fetched[0].id(), *panels[0].id());

    // The stale completion did not disturb the indicator either.
    assert_eq!(*sync.subscribe_status().borrow(), SyncStatus::Saved { seq: 2 });
}

#[tokio::test]
async fn backend_failure_reports_failed_without_rollback() {
    let adapter = Arc::new(FlakyAdapter {
        inner: InMemoryAdapter::new(),
    });
    let session = adapter.create_session("text").await.unwrap();
    let panel = Panel::new(0, 0, "beat", "prompt", 0);
    let sync = ReorderSync::new(adapter, session);

    let result = sync.push_order(vec![(*panel.id(), 0)]).await;
    assert!(result.is_err());
    assert_eq!(*sync.subscribe_status().borrow(), SyncStatus::Failed { seq: 1 });
}

#[tokio::test]
async fn sequence_numbers_are_strictly_increasing() {
    let adapter = Arc::new(InMemoryAdapter::new());
    let session = adapter.create_session("text").await.unwrap();
    let sync = ReorderSync::new(adapter, session);

    let seqs: Vec<u64> = (0..5).map(|_| sync.stamp(Vec::new()).seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn events_carry_the_full_order_map() {
    let adapter = Arc::new(InMemoryAdapter::new());
    let (session, panels) = seeded_session(&adapter, 3).await;
    let sync = ReorderSync::new(adapter.clone(), session);

    let order: Vec<_> = panels
        .iter()
        .enumerate()
        .map(|(rank, p)| (*p.id(), rank as i32))
        .collect();
    let event = sync.stamp(order.clone());
    assert_eq!(event, OrderSyncEvent { seq: 1, order });

    // Replaying the identical map through the adapter is idempotent in
    // effect; only the sequence guard refuses the second application.
    sync.push(event.clone()).await.unwrap();
    assert!(sync.push(event).await.is_err());
    assert_eq!(adapter.last_applied_seq(session), Some(1));
}

//! REST persistence adapter.
//!
//! Talks to a PostgREST-style backend (tables `user_sessions`,
//! `story_analyses`, `panels`) with an api-key header. The sequence guard
//! for order syncs is enforced twice: a filtered update on the session row
//! drops a wholly stale push before any rank goes out, and each rank write
//! carries the same `order_seq` filter on its panel row, so a stale push
//! that interleaves with a newer one cannot overwrite the newer ranks.

use crate::PersistenceAdapter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hokusai_core::{AnalysisId, Panel, PanelId, SessionId, StoryAnalysis};
use hokusai_error::{
    HokusaiResult, HttpError, ServiceError, ServiceErrorKind, SyncConflictError,
};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// One row of the `panels` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PanelRow {
    id: PanelId,
    session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    analysis_id: Option<AnalysisId>,
    scene_index: i32,
    panel_index: i32,
    narrative_description: String,
    visual_prompt: String,
    image_url: Option<String>,
    display_order: i32,
    /// Sequence number of the last order sync that wrote this row's rank
    #[serde(default)]
    order_seq: u64,
    created_at: DateTime<Utc>,
}

impl PanelRow {
    fn new(session: SessionId, analysis: AnalysisId, panel: &Panel) -> Self {
        Self {
            id: *panel.id(),
            session_id: session,
            analysis_id: Some(analysis),
            scene_index: *panel.scene_index(),
            panel_index: *panel.panel_index(),
            narrative_description: panel.narrative_description().clone(),
            visual_prompt: panel.visual_prompt().clone(),
            image_url: panel.image_url().clone(),
            display_order: *panel.display_order(),
            order_seq: 0,
            created_at: *panel.created_at(),
        }
    }

    fn into_panel(self) -> Panel {
        Panel::restore(
            self.id,
            self.scene_index,
            self.panel_index,
            self.narrative_description,
            self.visual_prompt,
            self.image_url,
            self.display_order,
            self.created_at,
        )
    }
}

#[derive(Debug, Serialize)]
struct SessionRow {
    id: SessionId,
    input_text: String,
    order_seq: u64,
}

#[derive(Debug, Deserialize)]
struct OrderSeqRow {
    order_seq: u64,
}

#[derive(Debug, Serialize)]
struct AnalysisRow<'a> {
    id: AnalysisId,
    session_id: SessionId,
    title: &'a str,
    characters: serde_json::Value,
    scenes: serde_json::Value,
}

/// Adapter backed by a PostgREST-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct RestAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestAdapter {
    /// Creates a new REST adapter.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the backend, without the `/rest/v1` suffix
    /// * `api_key` - API key sent as both `apikey` and bearer token
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(url = %base_url, "Created REST persistence adapter");
        Self {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Compare-and-set URL for the session-level sequence guard.
    fn order_guard_url(&self, session: SessionId, seq: u64) -> String {
        format!(
            "{}?id=eq.{}&order_seq=lt.{}",
            self.table_url("user_sessions"),
            session,
            seq
        )
    }

    /// Rank-write URL carrying the per-row sequence guard.
    fn rank_write_url(&self, id: PanelId, seq: u64) -> String {
        format!(
            "{}?id=eq.{}&order_seq=lt.{}",
            self.table_url("panels"),
            id,
            seq
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check(&self, response: Response, context: &str) -> HokusaiResult<Response> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, context, error = %error_text, "Backend error");
            return Err(ServiceError::new(ServiceErrorKind::Api {
                status_code: status.as_u16(),
                message: format!("{}: {}", context, error_text),
            })
            .into());
        }
        Ok(response)
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        context: &str,
    ) -> HokusaiResult<Response> {
        let response = self.request(builder).send().await.map_err(|e| {
            error!(context, error = ?e, "HTTP request failed");
            HttpError::new(format!("{}: {}", context, e))
        })?;
        self.check(response, context).await
    }

    /// The last applied order sequence for a session, for conflict reports.
    async fn current_order_seq(&self, session: SessionId) -> HokusaiResult<u64> {
        let url = format!(
            "{}?id=eq.{}&select=order_seq",
            self.table_url("user_sessions"),
            session
        );
        let response = self.send(self.client.get(&url), "read order_seq").await?;
        let rows: Vec<OrderSeqRow> = response.json().await.map_err(|e| {
            ServiceError::new(ServiceErrorKind::MalformedResponse(e.to_string()))
        })?;
        Ok(rows.first().map(|r| r.order_seq).unwrap_or(0))
    }
}

#[async_trait]
impl PersistenceAdapter for RestAdapter {
    #[instrument(skip(self, input_text))]
    async fn create_session(&self, input_text: &str) -> HokusaiResult<SessionId> {
        let id = SessionId::new();
        let row = SessionRow {
            id,
            input_text: input_text.to_string(),
            order_seq: 0,
        };
        self.send(
            self.client.post(self.table_url("user_sessions")).json(&row),
            "create session",
        )
        .await?;
        debug!(session = %id, "Created session");
        Ok(id)
    }

    #[instrument(skip(self, analysis), fields(session = %session))]
    async fn save_analysis(
        &self,
        session: SessionId,
        analysis: &StoryAnalysis,
    ) -> HokusaiResult<AnalysisId> {
        let id = AnalysisId::new();
        let row = AnalysisRow {
            id,
            session_id: session,
            title: analysis.title_or_default(),
            characters: serde_json::to_value(&analysis.characters).map_err(|e| {
                ServiceError::new(ServiceErrorKind::MalformedResponse(e.to_string()))
            })?,
            scenes: serde_json::to_value(&analysis.scenes).map_err(|e| {
                ServiceError::new(ServiceErrorKind::MalformedResponse(e.to_string()))
            })?,
        };
        self.send(
            self.client.post(self.table_url("story_analyses")).json(&row),
            "save analysis",
        )
        .await?;
        Ok(id)
    }

    #[instrument(skip(self, panels), fields(session = %session, count = panels.len()))]
    async fn insert_panels(
        &self,
        session: SessionId,
        analysis: AnalysisId,
        panels: &[Panel],
    ) -> HokusaiResult<()> {
        if panels.is_empty() {
            return Ok(());
        }
        let rows: Vec<PanelRow> = panels
            .iter()
            .map(|p| PanelRow::new(session, analysis, p))
            .collect();
        self.send(
            self.client.post(self.table_url("panels")).json(&rows),
            "insert panels",
        )
        .await?;
        debug!(count = rows.len(), "Inserted panels");
        Ok(())
    }

    #[instrument(skip(self), fields(session = %session))]
    async fn fetch_panels(&self, session: SessionId) -> HokusaiResult<Vec<Panel>> {
        let url = format!(
            "{}?session_id=eq.{}&order=display_order.asc,created_at.asc",
            self.table_url("panels"),
            session
        );
        let response = self.send(self.client.get(&url), "fetch panels").await?;
        let rows: Vec<PanelRow> = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse panel rows");
            ServiceError::new(ServiceErrorKind::MalformedResponse(e.to_string()))
        })?;
        debug!(count = rows.len(), "Fetched panels");
        Ok(rows.into_iter().map(PanelRow::into_panel).collect())
    }

    #[instrument(skip(self, image_url), fields(panel = %id))]
    async fn update_panel_image(&self, id: PanelId, image_url: &str) -> HokusaiResult<()> {
        let url = format!("{}?id=eq.{}", self.table_url("panels"), id);
        self.send(
            self.client
                .patch(&url)
                .json(&serde_json::json!({ "image_url": image_url })),
            "update panel image",
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(panel = %id))]
    async fn delete_panel(&self, id: PanelId) -> HokusaiResult<()> {
        let url = format!("{}?id=eq.{}", self.table_url("panels"), id);
        self.send(self.client.delete(&url), "delete panel").await?;
        Ok(())
    }

    #[instrument(skip(self, order), fields(session = %session, seq))]
    async fn set_panel_order(
        &self,
        session: SessionId,
        seq: u64,
        order: &[(PanelId, i32)],
    ) -> HokusaiResult<()> {
        // Advance the guard column first. The filter makes the update a
        // compare-and-set: a stale seq matches no row and writes nothing.
        let response = self
            .send(
                self.client
                    .patch(self.order_guard_url(session, seq))
                    .header("Prefer", "return=representation")
                    .json(&serde_json::json!({ "order_seq": seq })),
                "advance order_seq",
            )
            .await?;
        let updated: Vec<serde_json::Value> = response.json().await.map_err(|e| {
            ServiceError::new(ServiceErrorKind::MalformedResponse(e.to_string()))
        })?;
        if updated.is_empty() {
            let applied = self.current_order_seq(session).await.unwrap_or(seq);
            return Err(SyncConflictError::new(session.to_string(), seq, applied).into());
        }

        // Each rank write repeats the guard on its own row. A push that
        // passed the session guard but lost the race to a newer one finds
        // `order_seq` already advanced on the rows the newer push touched,
        // so its stale ranks match nothing instead of overwriting.
        for (id, display_order) in order {
            self.send(
                self.client
                    .patch(self.rank_write_url(*id, seq))
                    .json(&serde_json::json!({
                        "display_order": display_order,
                        "order_seq": seq,
                    })),
                "update display_order",
            )
            .await?;
        }
        debug!(seq, count = order.len(), "Applied order sync");
        Ok(())
    }
}

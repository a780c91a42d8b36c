//! Reorder synchronization.
//!
//! Replicates each local reorder to the persistence backend without
//! blocking the optimistic change that already happened. Every event
//! carries a per-session monotonically increasing sequence number; the
//! backend drops any event older than the last one it applied, so two
//! overlapping pushes completing out of network order cannot regress the
//! stored order. Local state is never rolled back on failure.

use hokusai_core::{PanelId, SessionId};
use hokusai_error::{HokusaiError, HokusaiResult};
use hokusai_persistence::PersistenceAdapter;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

/// Backend replication state, surfaced to presentation as the
/// "Saving…" / "not saved" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No sync has been issued yet
    Idle,
    /// A push is in flight
    Saving {
        /// Sequence number of the in-flight event
        seq: u64,
    },
    /// The most recent completed push was applied
    Saved {
        /// Sequence number the backend applied
        seq: u64,
    },
    /// The most recent completed push failed; local order remains the
    /// user-visible truth and a later reorder will retry implicitly
    Failed {
        /// Sequence number of the failed event
        seq: u64,
    },
}

/// One outbox entry: an idempotent, sequence-numbered bulk order upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSyncEvent {
    /// Per-session sequence number
    pub seq: u64,
    /// Full `(panel id, rank)` map at the time of the reorder
    pub order: Vec<(PanelId, i32)>,
}

/// Pushes reorder outcomes to the persistence backend.
pub struct ReorderSync {
    adapter: Arc<dyn PersistenceAdapter>,
    session: SessionId,
    next_seq: AtomicU64,
    latest_done: AtomicU64,
    status: watch::Sender<SyncStatus>,
}

impl ReorderSync {
    /// Create a sync for one session.
    pub fn new(adapter: Arc<dyn PersistenceAdapter>, session: SessionId) -> Self {
        let (status, _) = watch::channel(SyncStatus::Idle);
        Self {
            adapter,
            session,
            next_seq: AtomicU64::new(0),
            latest_done: AtomicU64::new(0),
            status,
        }
    }

    /// The session this sync replicates.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Subscribe to replication status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Stamp a reorder outcome as the next outbox event.
    pub fn stamp(&self, order: Vec<(PanelId, i32)>) -> OrderSyncEvent {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        OrderSyncEvent { seq, order }
    }

    /// Push one stamped event to the backend.
    ///
    /// # Errors
    ///
    /// Transient backend failures come back as retryable errors; a sync
    /// conflict means a newer ordering already won and is not a failure
    /// worth surfacing to the user. Neither rolls back local state.
    #[instrument(skip(self, event), fields(session = %self.session, seq = event.seq))]
    pub async fn push(&self, event: OrderSyncEvent) -> HokusaiResult<()> {
        if event.seq > self.latest_done.load(Ordering::SeqCst) {
            self.publish(SyncStatus::Saving { seq: event.seq });
        }

        let result = self
            .adapter
            .set_panel_order(self.session, event.seq, &event.order)
            .await;

        // Only the newest completion drives the indicator; a slower, older
        // push must not overwrite what the user sees about the latest one.
        let prev = self.latest_done.fetch_max(event.seq, Ordering::SeqCst);
        let newest = prev <= event.seq;

        match result {
            Ok(()) => {
                if newest {
                    self.publish(SyncStatus::Saved { seq: event.seq });
                }
                debug!("Order sync applied");
                Ok(())
            }
            Err(HokusaiError::SyncConflict(e)) => {
                debug!(applied = e.applied_seq, "Order sync superseded");
                Err(HokusaiError::SyncConflict(e))
            }
            Err(e) => {
                if newest {
                    self.publish(SyncStatus::Failed { seq: event.seq });
                }
                warn!(error = %e, "Order sync failed; local order remains the truth");
                Err(e)
            }
        }
    }

    /// Stamp and push in one step.
    pub async fn push_order(&self, order: Vec<(PanelId, i32)>) -> HokusaiResult<()> {
        let event = self.stamp(order);
        self.push(event).await
    }

    fn publish(&self, status: SyncStatus) {
        let _ = self.status.send(status);
    }
}

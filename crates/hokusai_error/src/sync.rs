//! Order-sync conflict error types.

/// Error for a reorder sync whose sequence number was stale on arrival.
///
/// The persistence side applies a bulk order update only when its sequence
/// number exceeds the last one applied for the session. A stale write is
/// dropped, not an inconsistency: a newer ordering already won.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Sync Conflict: sequence {} rejected, {} already applied for session {} at line {} in {}",
    stale_seq, applied_seq, session, line, file
)]
pub struct SyncConflictError {
    /// Session whose ordering was being synced
    pub session: String,
    /// The sequence number that arrived stale
    pub stale_seq: u64,
    /// The sequence number already applied
    pub applied_seq: u64,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SyncConflictError {
    /// Create a new SyncConflictError with automatic location tracking.
    #[track_caller]
    pub fn new(session: impl Into<String>, stale_seq: u64, applied_seq: u64) -> Self {
        let location = std::panic::Location::caller();
        Self {
            session: session.into(),
            stale_seq,
            applied_seq,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl crate::RetryableError for SyncConflictError {
    // A stale sequence means a newer write superseded this one. Retrying
    // would replay an ordering the user has already moved past.
    fn is_retryable(&self) -> bool {
        false
    }
}

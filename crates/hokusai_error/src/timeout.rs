//! Timeout error types.

/// Error for an operation that exceeded its wait ceiling.
///
/// Timeouts are always retryable: the remote side may well have been healthy
/// and merely slow.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Timeout Error: {} exceeded {}s at line {} in {}", operation, ceiling_secs, line, file)]
pub struct TimeoutError {
    /// The operation that timed out
    pub operation: String,
    /// The ceiling that was exceeded, in seconds
    pub ceiling_secs: u64,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TimeoutError {
    /// Create a new TimeoutError with automatic location tracking.
    #[track_caller]
    pub fn new(operation: impl Into<String>, ceiling_secs: u64) -> Self {
        let location = std::panic::Location::caller();
        Self {
            operation: operation.into(),
            ceiling_secs,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl crate::RetryableError for TimeoutError {
    fn is_retryable(&self) -> bool {
        true
    }
}

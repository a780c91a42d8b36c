//! Not-found error types.

/// Error for operations targeting a panel or session that no longer exists.
///
/// Most mutations absorb a missing id as a no-op; this error is reserved for
/// callers that need the distinction, such as starting a generation.
///
/// # Examples
///
/// ```
/// use hokusai_error::NotFoundError;
///
/// let err = NotFoundError::panel("abc-123");
/// assert!(format!("{}", err).contains("abc-123"));
/// ```
#[derive(Debug, Clone)]
pub struct NotFoundError {
    /// Human-readable description of the missing target
    pub target: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError for an arbitrary target.
    #[track_caller]
    pub fn new(target: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            target: target.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a NotFoundError for a missing panel id.
    #[track_caller]
    pub fn panel(id: impl std::fmt::Display) -> Self {
        Self::new(format!("panel {}", id))
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Not Found: {} at line {} in {}",
            self.target, self.line, self.file
        )
    }
}

impl std::error::Error for NotFoundError {}

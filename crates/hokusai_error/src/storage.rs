//! Local storage error types.

/// Kinds of local draft-storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// I/O error during a storage operation
    #[display("I/O error: {}", _0)]
    Io(String),
    /// Draft file contents could not be parsed
    #[display("Corrupt draft: {}", _0)]
    Corrupt(String),
    /// No user data directory available on this platform
    #[display("No data directory available")]
    NoDataDir,
}

/// Local storage error with location tracking.
///
/// # Examples
///
/// ```
/// use hokusai_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NoDataDir);
/// assert!(format!("{}", err).contains("data directory"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Validation error types.

/// Specific validation failures for panel operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Visual prompt is empty or contains only whitespace
    EmptyPrompt,
    /// Input text is empty or contains only whitespace
    EmptyInput,
    /// Reorder index is outside the current collection bounds
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Current collection length
        len: usize,
    },
    /// A generation is already in flight for this panel
    GenerationInFlight(String),
    /// Panel already has an image and no regenerate intent was given
    ImageAlreadyPresent(String),
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationErrorKind::EmptyPrompt => write!(f, "Visual prompt cannot be empty"),
            ValidationErrorKind::EmptyInput => write!(f, "Input text cannot be empty"),
            ValidationErrorKind::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for {} panels", index, len)
            }
            ValidationErrorKind::GenerationInFlight(id) => {
                write!(f, "Generation already in flight for panel {}", id)
            }
            ValidationErrorKind::ImageAlreadyPresent(id) => {
                write!(f, "Panel {} already has an image; pass regenerate to replace it", id)
            }
        }
    }
}

/// Validation error with source location tracking.
///
/// # Examples
///
/// ```
/// use hokusai_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::EmptyPrompt);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The specific validation failure
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Validation Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ValidationError {}

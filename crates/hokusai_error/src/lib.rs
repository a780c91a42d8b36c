//! Error types for the Hokusai storyboard engine.
//!
//! Each domain gets its own error type with `#[track_caller]` source-location
//! capture; [`HokusaiError`] is the umbrella used at crate seams, with
//! `From` conversions so `?` flows naturally across crates.

mod config;
mod http;
mod not_found;
mod service;
mod storage;
mod sync;
mod timeout;
mod validation;

pub use config::ConfigError;
pub use http::HttpError;
pub use not_found::NotFoundError;
pub use service::{RetryableError, ServiceError, ServiceErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use sync::SyncConflictError;
pub use timeout::TimeoutError;
pub use validation::{ValidationError, ValidationErrorKind};

/// Umbrella error for all Hokusai operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::From, derive_more::Error)]
pub enum HokusaiError {
    /// Invalid input or operation arguments
    Validation(ValidationError),
    /// Operation targeted a missing panel or session
    NotFound(NotFoundError),
    /// Transport-level network failure
    Http(HttpError),
    /// Remote service reached but returned failure
    Service(ServiceError),
    /// Operation exceeded its wait ceiling
    Timeout(TimeoutError),
    /// Stale reorder sync dropped by the persistence side
    SyncConflict(SyncConflictError),
    /// Configuration load or parse failure
    Config(ConfigError),
    /// Local draft storage failure
    Storage(StorageError),
}

/// Result alias used throughout the workspace.
pub type HokusaiResult<T> = Result<T, HokusaiError>;

impl RetryableError for HokusaiError {
    fn is_retryable(&self) -> bool {
        match self {
            HokusaiError::Http(_) => true,
            HokusaiError::Service(e) => e.is_retryable(),
            HokusaiError::Timeout(e) => e.is_retryable(),
            HokusaiError::SyncConflict(e) => e.is_retryable(),
            HokusaiError::Validation(_)
            | HokusaiError::NotFound(_)
            | HokusaiError::Config(_)
            | HokusaiError::Storage(_) => false,
        }
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            HokusaiError::Service(e) => e.retry_strategy_params(),
            _ => (2000, 5, 60),
        }
    }
}

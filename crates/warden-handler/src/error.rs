//! Handler error types.

use thiserror::Error;
use warden_core::SecurityError;

/// Errors a tool handler reports.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler refused the invocation during validation.
    #[error("{0}")]
    Rejected(String),

    /// Arguments did not match what the handler expects.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The handler ran and failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The handler exceeded its declared timeout.
    #[error("timed out after {0}ms")]
    Timeout(u64),

    /// I/O error inside the handler.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

impl From<HandlerError> for SecurityError {
    /// Validation failures surface as [`SecurityError::HandlerRejected`] with
    /// the handler's message as the reason.
    fn from(err: HandlerError) -> Self {
        SecurityError::HandlerRejected {
            reason: err.to_string(),
        }
    }
}

//! Error types for traversal and filtering.

/// Errors from walk and filter operations.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// The filter pattern does not compile under the chosen mode.
    #[error("invalid {mode} pattern {pattern:?}: {reason}")]
    InvalidPattern {
        mode: &'static str,
        pattern: String,
        reason: String,
    },
}

/// Result alias for walk operations.
pub type WalkResult<T> = Result<T, WalkError>;

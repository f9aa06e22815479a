//! Error types for path parsing.

/// Errors from parsing or joining paths.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The raw string cannot be parsed as an absolute store path.
    #[error("invalid path {raw:?}: {reason}")]
    InvalidPath { raw: String, reason: String },
}

/// Result alias for path operations.
pub type PathResult<T> = Result<T, PathError>;

//! Error types for copy operations.

use grove_path::Path;

/// Errors that can occur while copying between stores.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// A source path listed in the copy spec does not exist.
    #[error("source path not found: {0}")]
    SourceNotFound(Path),

    /// The destination path already holds data and the policy is `Fail`.
    #[error("destination already exists: {0}")]
    Conflict(Path),

    /// Two spec entries target the same destination path.
    #[error("duplicate destination in copy spec: {0}")]
    DuplicateDestination(Path),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] grove_store::StoreError),
}

/// Convenience alias for copy results.
pub type CopyResult<T> = Result<T, CopyError>;

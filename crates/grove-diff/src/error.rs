//! Error types for the diff crate.

use grove_path::Path;

/// Errors that can occur during comparison.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A rename pair cannot be applied unambiguously.
    #[error("ambiguous rename for {path}: {reason}")]
    AmbiguousRename { path: Path, reason: String },

    /// Compared datasets have different dimensions; never considered equal.
    #[error("shape mismatch: {path_a} has {shape_a:?}, {path_b} has {shape_b:?}")]
    ShapeMismatch {
        path_a: Path,
        path_b: Path,
        shape_a: Vec<usize>,
        shape_b: Vec<usize>,
    },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] grove_store::StoreError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;

//! Error types for store operations.

use grove_path::Path;

/// Errors from hierarchical store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested path does not exist.
    #[error("path not found: {0}")]
    NotFound(Path),

    /// The path exists but is a group where a dataset was expected.
    #[error("not a dataset: {0}")]
    NotADataset(Path),

    /// The path exists but is a dataset where a group was expected.
    #[error("not a group: {0}")]
    NotAGroup(Path),

    /// The node exists but its contents cannot be read (corrupted region).
    #[error("unreadable node {path}: {reason}")]
    Unreadable { path: Path, reason: String },

    /// A dataset or group already occupies the target path.
    #[error("path already exists: {0}")]
    AlreadyExists(Path),

    /// The element count does not match the product of the shape dimensions.
    #[error("shape {shape:?} does not hold {len} elements")]
    ShapeLenMismatch { shape: Vec<usize>, len: usize },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The on-disk container is malformed or fails its checksum.
    #[error("corrupt file {file}: {reason}")]
    CorruptFile { file: std::path::PathBuf, reason: String },

    /// Write attempted on a store opened read-only.
    #[error("store is read-only")]
    ReadOnly,

    /// Removal attempted on the root group.
    #[error("the root group cannot be removed")]
    IsRoot,

    /// I/O error from the underlying file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

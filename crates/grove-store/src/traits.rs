use grove_path::Path;

use crate::error::StoreResult;
use crate::value::{Attributes, NodeKind, Value};

/// A handle to an open hierarchical store.
///
/// All implementations must satisfy these invariants:
/// - The hierarchy is acyclic; every walk terminates.
/// - `list_children` returns children in the store's native order, stable
///   across repeated calls on an unmodified store.
/// - Handle lifecycle (open/close) is the caller's responsibility; the core
///   never owns the underlying resource.
/// - All I/O errors are propagated, never silently ignored.
/// - Handles are not assumed thread-safe; single-writer discipline is the
///   caller's job.
pub trait HierStore {
    /// The kind of node at `path`, or `None` if nothing exists there.
    fn kind_of(&self, path: &Path) -> StoreResult<Option<NodeKind>>;

    /// Check whether a path exists.
    fn exists(&self, path: &Path) -> StoreResult<bool> {
        Ok(self.kind_of(path)?.is_some())
    }

    /// Children of the group at `path`, in native (insertion) order.
    ///
    /// Returns `Err(NotFound)` for a missing path, `Err(NotAGroup)` for a
    /// dataset, and `Err(Unreadable)` for a corrupted region.
    fn list_children(&self, path: &Path) -> StoreResult<Vec<(String, NodeKind)>>;

    /// Read the dataset at `path` fully into memory.
    fn read_dataset(&self, path: &Path) -> StoreResult<Value>;

    /// Write a dataset at `path`.
    ///
    /// The parent group must already exist. An existing dataset at `path` is
    /// replaced; an existing group is an error (`AlreadyExists`).
    fn write_dataset(&self, path: &Path, value: Value) -> StoreResult<()>;

    /// Read all attributes of the node at `path`.
    fn read_attrs(&self, path: &Path) -> StoreResult<Attributes>;

    /// Replace the attributes of the node at `path`.
    fn write_attrs(&self, path: &Path, attrs: Attributes) -> StoreResult<()>;

    /// Create the group at `path`, creating missing intermediate groups.
    ///
    /// Idempotent: an existing group at `path` is a no-op. A dataset at
    /// `path` or along the way is an error.
    fn create_group(&self, path: &Path) -> StoreResult<()>;

    /// Remove the node at `path`; a group is removed with its whole subtree.
    ///
    /// The root cannot be removed. Returns `Err(NotFound)` if nothing exists
    /// at `path`.
    fn remove(&self, path: &Path) -> StoreResult<()>;
}

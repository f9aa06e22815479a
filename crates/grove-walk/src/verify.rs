//! Dataset readability verification.

use tracing::warn;

use grove_path::Path;
use grove_store::{HierStore, NodeKind};

use crate::walk::Unreadable;

/// Outcome of trying to read every listed path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VerifyReport {
    /// Paths whose content was read successfully.
    pub readable: Vec<Path>,
    /// Paths that failed to read, with the failure reason.
    pub unreadable: Vec<Unreadable>,
}

impl VerifyReport {
    /// Returns `true` if every path was readable.
    pub fn is_clean(&self) -> bool {
        self.unreadable.is_empty()
    }
}

/// Try reading each path: dataset content for datasets, attributes for
/// groups. Failures are recorded and do not abort the batch.
pub fn verify(store: &dyn HierStore, paths: &[Path]) -> VerifyReport {
    let mut report = VerifyReport::default();
    for path in paths {
        let result = match store.kind_of(path) {
            Ok(Some(NodeKind::Dataset)) => store.read_dataset(path).map(|_| ()),
            Ok(Some(NodeKind::Group)) => store.read_attrs(path).map(|_| ()),
            Ok(None) => Err(grove_store::StoreError::NotFound(path.clone())),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => report.readable.push(path.clone()),
            Err(e) => {
                warn!(path = %path, error = %e, "unreadable");
                report.unreadable.push(Unreadable {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    report
}

//! Salvage readable content out of a damaged store.

use tracing::info;

use grove_path::Path;
use grove_store::HierStore;
use grove_walk::{attributed_groups, verify, walk, Unreadable, WalkKind};

use crate::copy::{copy, ConflictPolicy, CopySpec};
use crate::error::CopyResult;

/// What a repair run salvaged and what it had to drop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepairReport {
    /// Paths copied into the destination.
    pub salvaged: Vec<Path>,
    /// Paths that could not be read, with the reason.
    pub dropped: Vec<Unreadable>,
}

impl RepairReport {
    /// Returns `true` if nothing had to be dropped.
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Copy every readable dataset (and every attributed group) from `source`
/// into `destination`, skipping corrupted regions.
///
/// The destination is expected to be fresh; existing content is overwritten.
pub fn repair(source: &dyn HierStore, destination: &dyn HierStore) -> CopyResult<RepairReport> {
    let mut report = RepairReport::default();

    let scan = walk(source, &Path::root(), WalkKind::Datasets);
    report.dropped.extend(scan.unreadable().iter().cloned());

    let verified = verify(source, scan.paths());
    report.dropped.extend(verified.unreadable);

    // Group attributes ride along; groups whose attributes cannot be read
    // were already skipped by attributed_groups.
    let groups = attributed_groups(source, &Path::root());

    let spec = CopySpec::mirror(verified.readable.into_iter().chain(groups));
    let copied = copy(&spec, source, destination, ConflictPolicy::Overwrite)?;
    report.salvaged = copied.copied;

    info!(
        salvaged = report.salvaged.len(),
        dropped = report.dropped.len(),
        "repair finished"
    );
    Ok(report)
}

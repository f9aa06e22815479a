//! Selective copying of datasets and attributes between stores.
//!
//! A [`CopySpec`] maps destination paths to source paths. Pairs are processed
//! in ascending destination order so reports are reproducible; intermediate
//! groups are created on demand, so re-running a copy against a partially
//! populated destination is safe. The copy is not transactional across
//! pairs: a `Fail`-policy abort leaves earlier pairs in place.

use std::collections::BTreeMap;

use tracing::debug;

use grove_path::Path;
use grove_store::{HierStore, NodeKind};

use crate::error::{CopyError, CopyResult};

/// What to do when the destination path already holds data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Leave existing data, record the pair as skipped.
    #[default]
    Skip,
    /// Replace existing data.
    Overwrite,
    /// Abort the whole operation.
    Fail,
}

/// A mapping from destination path to source path, consumed by [`copy`].
///
/// Destination keys are unique: two sources cannot target one destination.
#[derive(Clone, Debug, Default)]
pub struct CopySpec {
    entries: BTreeMap<Path, Path>,
}

impl CopySpec {
    /// An empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a (destination, source) pair. Fails on a duplicate destination.
    pub fn insert(&mut self, dest: Path, source: Path) -> CopyResult<()> {
        if self.entries.contains_key(&dest) {
            return Err(CopyError::DuplicateDestination(dest));
        }
        self.entries.insert(dest, source);
        Ok(())
    }

    /// Spec copying each path to the same path in the destination.
    pub fn mirror(paths: impl IntoIterator<Item = Path>) -> Self {
        Self {
            entries: paths.into_iter().map(|p| (p.clone(), p)).collect(),
        }
    }

    /// Spec copying each path under a destination prefix.
    pub fn under_prefix(paths: impl IntoIterator<Item = Path>, prefix: &Path) -> Self {
        Self {
            entries: paths
                .into_iter()
                .map(|p| {
                    let mut dest = prefix.clone();
                    for segment in p.segments() {
                        dest = dest.child(segment).expect("segment already validated");
                    }
                    (dest, p)
                })
                .collect(),
        }
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the spec has no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs as (destination, source), ascending by destination.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries.iter()
    }
}

/// What a copy run did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CopyReport {
    /// Destination paths written.
    pub copied: Vec<Path>,
    /// Destination paths left alone (conflict under `Skip`, or missing
    /// source under a non-`Fail` policy).
    pub skipped: Vec<Path>,
}

/// Copy dataset content and attributes for every pair in `spec`.
///
/// Group sources are copied as a group node plus attributes; their
/// descendants are whatever other spec entries name. A missing source is
/// fatal under [`ConflictPolicy::Fail`] and recorded as skipped otherwise.
pub fn copy(
    spec: &CopySpec,
    source: &dyn HierStore,
    destination: &dyn HierStore,
    on_conflict: ConflictPolicy,
) -> CopyResult<CopyReport> {
    let mut report = CopyReport::default();

    for (dest_path, source_path) in spec.iter() {
        let source_kind = match source.kind_of(source_path)? {
            Some(kind) => kind,
            None => {
                if on_conflict == ConflictPolicy::Fail {
                    return Err(CopyError::SourceNotFound(source_path.clone()));
                }
                debug!(source = %source_path, "source missing, skipping");
                report.skipped.push(dest_path.clone());
                continue;
            }
        };

        if let Some(parent) = dest_path.parent() {
            destination.create_group(&parent)?;
        }

        if destination.exists(dest_path)? {
            match on_conflict {
                ConflictPolicy::Skip => {
                    report.skipped.push(dest_path.clone());
                    continue;
                }
                ConflictPolicy::Fail => {
                    return Err(CopyError::Conflict(dest_path.clone()));
                }
                ConflictPolicy::Overwrite => {
                    // Same-kind writes replace in place; a cross-kind
                    // replacement needs the old node gone first.
                    if destination.kind_of(dest_path)? != Some(source_kind) {
                        destination.remove(dest_path)?;
                    }
                }
            }
        }

        match source_kind {
            NodeKind::Dataset => {
                let value = source.read_dataset(source_path)?;
                destination.write_dataset(dest_path, value)?;
            }
            NodeKind::Group => {
                destination.create_group(dest_path)?;
            }
        }
        let attrs = source.read_attrs(source_path)?;
        destination.write_attrs(dest_path, attrs)?;
        report.copied.push(dest_path.clone());
    }

    Ok(report)
}

/// Copy the entire hierarchy under the root: every group (with attributes)
/// and every dataset. Errors propagate; use [`crate::repair`] for a
/// corruption-tolerant variant.
pub fn copy_tree(source: &dyn HierStore, destination: &dyn HierStore) -> CopyResult<CopyReport> {
    let walk = grove_walk::walk(source, &Path::root(), grove_walk::WalkKind::Both);
    if let Some(bad) = walk.unreadable().first() {
        return Err(CopyError::Store(grove_store::StoreError::Unreadable {
            path: bad.path.clone(),
            reason: bad.reason.clone(),
        }));
    }
    let spec = CopySpec::mirror(walk.into_paths());
    copy(&spec, source, destination, ConflictPolicy::Overwrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_diff::{deep_diff, PathSet, RenameMap};
    use grove_store::{Attributes, MemoryStore, Value};

    fn p(raw: &str) -> Path {
        Path::parse(raw).unwrap()
    }

    fn source_with_src_a() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_group(&p("/src")).unwrap();
        store
            .write_dataset(&p("/src/a"), Value::int_1d(vec![1, 2, 3]))
            .unwrap();
        store
    }

    #[test]
    fn copy_creates_intermediate_groups() {
        // Destination lacks /dst entirely.
        let source = source_with_src_a();
        let dest = MemoryStore::new();
        let mut spec = CopySpec::new();
        spec.insert(p("/dst/a"), p("/src/a")).unwrap();

        let report = copy(&spec, &source, &dest, ConflictPolicy::Fail).unwrap();
        assert_eq!(report.copied, [p("/dst/a")]);
        assert_eq!(dest.kind_of(&p("/dst")).unwrap(), Some(NodeKind::Group));
        assert_eq!(
            dest.read_dataset(&p("/dst/a")).unwrap(),
            Value::int_1d(vec![1, 2, 3])
        );
    }

    #[test]
    fn skip_leaves_existing_content() {
        let source = source_with_src_a();
        let dest = MemoryStore::new();
        dest.create_group(&p("/dst")).unwrap();
        dest.write_dataset(&p("/dst/a"), Value::scalar_int(99)).unwrap();

        let mut spec = CopySpec::new();
        spec.insert(p("/dst/a"), p("/src/a")).unwrap();
        let report = copy(&spec, &source, &dest, ConflictPolicy::Skip).unwrap();

        assert_eq!(report.skipped, [p("/dst/a")]);
        assert!(report.copied.is_empty());
        assert_eq!(dest.read_dataset(&p("/dst/a")).unwrap(), Value::scalar_int(99));
    }

    #[test]
    fn overwrite_replaces_existing_content() {
        let source = source_with_src_a();
        let dest = MemoryStore::new();
        dest.create_group(&p("/dst")).unwrap();
        dest.write_dataset(&p("/dst/a"), Value::scalar_int(99)).unwrap();

        let mut spec = CopySpec::new();
        spec.insert(p("/dst/a"), p("/src/a")).unwrap();
        let report = copy(&spec, &source, &dest, ConflictPolicy::Overwrite).unwrap();

        assert_eq!(report.copied, [p("/dst/a")]);
        assert_eq!(
            dest.read_dataset(&p("/dst/a")).unwrap(),
            Value::int_1d(vec![1, 2, 3])
        );
    }

    #[test]
    fn overwrite_replaces_across_kinds() {
        // Dataset over an existing group subtree, and group over an
        // existing dataset.
        let source = source_with_src_a();
        source.create_group(&p("/src/grp")).unwrap();

        let dest = MemoryStore::new();
        dest.create_group(&p("/dst/a/leftover")).unwrap();
        dest.write_dataset(&p("/dst/grp"), Value::scalar_int(5)).unwrap();

        let mut spec = CopySpec::new();
        spec.insert(p("/dst/a"), p("/src/a")).unwrap();
        spec.insert(p("/dst/grp"), p("/src/grp")).unwrap();
        let report = copy(&spec, &source, &dest, ConflictPolicy::Overwrite).unwrap();

        assert_eq!(report.copied, [p("/dst/a"), p("/dst/grp")]);
        assert_eq!(
            dest.read_dataset(&p("/dst/a")).unwrap(),
            Value::int_1d(vec![1, 2, 3])
        );
        assert!(!dest.exists(&p("/dst/a/leftover")).unwrap());
        assert_eq!(dest.kind_of(&p("/dst/grp")).unwrap(), Some(NodeKind::Group));
    }

    #[test]
    fn fail_aborts_without_rolling_back() {
        let source = source_with_src_a();
        let source2 = MemoryStore::new();
        source2.create_group(&p("/src")).unwrap();
        source2.write_dataset(&p("/src/a"), Value::scalar_int(1)).unwrap();
        source2.write_dataset(&p("/src/b"), Value::scalar_int(2)).unwrap();
        drop(source);

        let dest = MemoryStore::new();
        dest.create_group(&p("/dst")).unwrap();
        dest.write_dataset(&p("/dst/b"), Value::scalar_int(0)).unwrap();

        let mut spec = CopySpec::new();
        spec.insert(p("/dst/a"), p("/src/a")).unwrap();
        spec.insert(p("/dst/b"), p("/src/b")).unwrap();

        let result = copy(&spec, &source2, &dest, ConflictPolicy::Fail);
        assert!(matches!(result, Err(CopyError::Conflict(path)) if path == p("/dst/b")));
        // /dst/a (processed before the conflicting pair) stays copied.
        assert_eq!(dest.read_dataset(&p("/dst/a")).unwrap(), Value::scalar_int(1));
    }

    #[test]
    fn missing_source_fatal_only_under_fail() {
        let source = MemoryStore::new();
        let dest = MemoryStore::new();
        let mut spec = CopySpec::new();
        spec.insert(p("/dst/a"), p("/absent")).unwrap();

        assert!(matches!(
            copy(&spec, &source, &dest, ConflictPolicy::Fail),
            Err(CopyError::SourceNotFound(_))
        ));

        let report = copy(&spec, &source, &dest, ConflictPolicy::Skip).unwrap();
        assert_eq!(report.skipped, [p("/dst/a")]);
    }

    #[test]
    fn attributes_copied_verbatim() {
        let source = source_with_src_a();
        let mut attrs = Attributes::new();
        attrs.insert("units".into(), Value::scalar_str("kg"));
        source.write_attrs(&p("/src/a"), attrs.clone()).unwrap();

        let dest = MemoryStore::new();
        let mut spec = CopySpec::new();
        spec.insert(p("/dst/a"), p("/src/a")).unwrap();
        copy(&spec, &source, &dest, ConflictPolicy::Fail).unwrap();

        assert_eq!(dest.read_attrs(&p("/dst/a")).unwrap(), attrs);
    }

    #[test]
    fn duplicate_destination_rejected() {
        let mut spec = CopySpec::new();
        spec.insert(p("/dst"), p("/a")).unwrap();
        assert!(matches!(
            spec.insert(p("/dst"), p("/b")),
            Err(CopyError::DuplicateDestination(_))
        ));
    }

    #[test]
    fn rerunning_copy_is_idempotent() {
        let source = source_with_src_a();
        let dest = MemoryStore::new();
        let mut spec = CopySpec::new();
        spec.insert(p("/dst/a"), p("/src/a")).unwrap();

        copy(&spec, &source, &dest, ConflictPolicy::Overwrite).unwrap();
        let again = copy(&spec, &source, &dest, ConflictPolicy::Overwrite).unwrap();
        assert_eq!(again.copied, [p("/dst/a")]);
    }

    #[test]
    fn under_prefix_builds_prefixed_destinations() {
        let spec = CopySpec::under_prefix([p("/a/x"), p("/b")], &p("/backup"));
        let pairs: Vec<(String, String)> = spec
            .iter()
            .map(|(d, s)| (d.to_string(), s.to_string()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("/backup/a/x".to_string(), "/a/x".to_string()),
                ("/backup/b".to_string(), "/b".to_string()),
            ]
        );
    }

    #[test]
    fn copy_then_diff_round_trips() {
        // Copied paths compare clean at tolerance 0.
        let source = MemoryStore::new();
        source.create_group(&p("/g")).unwrap();
        source
            .write_dataset(&p("/g/x"), Value::float_1d(vec![1.5, 2.5]))
            .unwrap();
        source.write_dataset(&p("/y"), Value::scalar_str("s")).unwrap();

        let dest = MemoryStore::new();
        let spec = CopySpec::mirror([p("/g/x"), p("/y")]);
        copy(&spec, &source, &dest, ConflictPolicy::Fail).unwrap();

        let paths: PathSet = [p("/g/x"), p("/y")].into_iter().collect();
        let d = deep_diff(&source, &dest, &paths, &paths, &RenameMap::new(), 0.0).unwrap();
        assert!(d.only_in_source.is_empty());
        assert!(d.only_in_other.is_empty());
        assert!(d.unequal_content.is_empty());
    }

    #[test]
    fn copy_tree_mirrors_everything() {
        let source = MemoryStore::new();
        source.create_group(&p("/g/sub")).unwrap();
        source.write_dataset(&p("/g/x"), Value::scalar_int(1)).unwrap();
        let mut attrs = Attributes::new();
        attrs.insert("k".into(), Value::scalar_int(2));
        source.write_attrs(&p("/g"), attrs.clone()).unwrap();

        let dest = MemoryStore::new();
        copy_tree(&source, &dest).unwrap();
        assert_eq!(dest.kind_of(&p("/g/sub")).unwrap(), Some(NodeKind::Group));
        assert_eq!(dest.read_dataset(&p("/g/x")).unwrap(), Value::scalar_int(1));
        assert_eq!(dest.read_attrs(&p("/g")).unwrap(), attrs);
    }
}

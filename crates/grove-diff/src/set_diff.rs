//! Set-level diff: which paths exist where.
//!
//! Compares two path sets after optionally reinterpreting paths in the first
//! set through a rename map. Output ordering is ascending lexicographic in
//! every field so reports are reproducible.

use std::collections::BTreeSet;

use grove_path::Path;

use crate::error::{DiffError, DiffResult};

/// A deduplicated set of paths, iterated in ascending order.
pub type PathSet = BTreeSet<Path>;

/// Ordered (old, new) pairs reinterpreting paths in one store as paths in
/// the other. Duplicate `old` entries are rejected at insertion.
#[derive(Clone, Debug, Default)]
pub struct RenameMap {
    pairs: Vec<(Path, Path)>,
}

impl RenameMap {
    /// An empty rename map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rename pair. Fails if `old` is already mapped.
    pub fn push(&mut self, old: Path, new: Path) -> DiffResult<()> {
        if self.pairs.iter().any(|(o, _)| *o == old) {
            return Err(DiffError::AmbiguousRename {
                path: old,
                reason: "old path appears more than once in the rename map".into(),
            });
        }
        self.pairs.push((old, new));
        Ok(())
    }

    /// Build from pairs, rejecting duplicate old paths.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Path, Path)>) -> DiffResult<Self> {
        let mut map = Self::new();
        for (old, new) in pairs {
            map.push(old, new)?;
        }
        Ok(map)
    }

    /// Returns `true` if no pairs are present.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over the (old, new) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Path, Path)> {
        self.pairs.iter()
    }

    /// Reverse lookup: the `old` path that was renamed to `new`, if any.
    pub fn source_of(&self, new: &Path) -> Option<&Path> {
        self.pairs
            .iter()
            .find(|(_, n)| n == new)
            .map(|(old, _)| old)
    }
}

/// The result of comparing two path sets.
///
/// `only_in_source`, `only_in_other`, and `in_both` partition the union of
/// the (rename-adjusted) inputs. `unequal_content` is empty until content
/// comparison populates it; it is always a subset of `in_both`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diff {
    /// Present in the source set only.
    pub only_in_source: Vec<Path>,
    /// Present in the other set only.
    pub only_in_other: Vec<Path>,
    /// Present in both sets (post-rename path form).
    pub in_both: Vec<Path>,
    /// Matched pairs whose content differs.
    pub unequal_content: Vec<Path>,
}

impl Diff {
    /// Returns `true` when the sets match exactly and no content differs.
    pub fn is_empty(&self) -> bool {
        self.only_in_source.is_empty()
            && self.only_in_other.is_empty()
            && self.unequal_content.is_empty()
    }
}

/// Compare two path sets, applying `renames` to a working copy of `a`.
///
/// A rename pair whose `old` is absent from `a` is ignored. A rename whose
/// target is already present in `a` independently is ambiguous — there is no
/// way to report both entries without conflating them — and fails rather
/// than silently collapsing.
pub fn diff(a: &PathSet, b: &PathSet, renames: &RenameMap) -> DiffResult<Diff> {
    let mut adjusted = a.clone();
    for (old, new) in renames.iter() {
        if adjusted.remove(old) {
            if a.contains(new) && new != old {
                return Err(DiffError::AmbiguousRename {
                    path: new.clone(),
                    reason: "rename target already exists in the source set".into(),
                });
            }
            adjusted.insert(new.clone());
        }
    }

    Ok(Diff {
        only_in_source: adjusted.difference(b).cloned().collect(),
        only_in_other: b.difference(&adjusted).cloned().collect(),
        in_both: adjusted.intersection(b).cloned().collect(),
        unequal_content: Vec::new(),
    })
}

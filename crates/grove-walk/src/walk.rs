//! Depth-first traversal of a store hierarchy.
//!
//! The walk is tolerant: a subtree that cannot be enumerated is recorded as
//! unreadable and skipped, sibling subtrees are still visited. The result is
//! a finite, re-enumerable sequence — callers can iterate it any number of
//! times, and re-invoking [`walk`] on an unmodified store reproduces the
//! same sequence.

use tracing::warn;

use grove_path::Path;
use grove_store::{HierStore, NodeKind};

/// Which node kinds a walk produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkKind {
    Datasets,
    Groups,
    Both,
}

impl WalkKind {
    fn wants_datasets(self) -> bool {
        matches!(self, Self::Datasets | Self::Both)
    }

    fn wants_groups(self) -> bool {
        matches!(self, Self::Groups | Self::Both)
    }
}

/// A path the walk could not descend into, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct Unreadable {
    pub path: Path,
    pub reason: String,
}

/// The produced sequence of a traversal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Walk {
    paths: Vec<Path>,
    unreadable: Vec<Unreadable>,
}

impl Walk {
    /// Paths produced, in traversal (native child) order.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Consume the walk, returning the produced paths.
    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }

    /// Subtrees that were skipped because they could not be read.
    pub fn unreadable(&self) -> &[Unreadable] {
        &self.unreadable
    }

    /// Returns `true` if no unreadable region was encountered.
    pub fn is_clean(&self) -> bool {
        self.unreadable.is_empty()
    }

    /// Iterate over the produced paths.
    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }
}

impl<'a> IntoIterator for &'a Walk {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Walk the hierarchy under `root` depth-first, in native child order.
///
/// The root group itself is never produced; a root that is itself a dataset
/// is produced when `kind` includes datasets. A missing root is recorded as
/// unreadable rather than panicking or aborting.
pub fn walk(store: &dyn HierStore, root: &Path, kind: WalkKind) -> Walk {
    let mut out = Walk::default();
    match store.kind_of(root) {
        Ok(Some(NodeKind::Dataset)) => {
            if kind.wants_datasets() {
                out.paths.push(root.clone());
            }
        }
        Ok(Some(NodeKind::Group)) => visit(store, root, kind, &mut out),
        Ok(None) => out.unreadable.push(Unreadable {
            path: root.clone(),
            reason: "does not exist".into(),
        }),
        Err(e) => out.unreadable.push(Unreadable {
            path: root.clone(),
            reason: e.to_string(),
        }),
    }
    out
}

fn visit(store: &dyn HierStore, group: &Path, kind: WalkKind, out: &mut Walk) {
    let children = match store.list_children(group) {
        Ok(children) => children,
        Err(e) => {
            warn!(path = %group, error = %e, "skipping unreadable subtree");
            out.unreadable.push(Unreadable {
                path: group.clone(),
                reason: e.to_string(),
            });
            return;
        }
    };
    for (name, node_kind) in children {
        let child = match group.child(&name) {
            Ok(child) => child,
            Err(e) => {
                out.unreadable.push(Unreadable {
                    path: group.clone(),
                    reason: format!("child name {name:?}: {e}"),
                });
                continue;
            }
        };
        match node_kind {
            NodeKind::Dataset => {
                if kind.wants_datasets() {
                    out.paths.push(child);
                }
            }
            NodeKind::Group => {
                if kind.wants_groups() {
                    out.paths.push(child.clone());
                }
                visit(store, &child, kind, out);
            }
        }
    }
}

/// Paths of groups under `root` that carry at least one attribute.
///
/// Groups whose attributes cannot be read are skipped. Together with a
/// dataset walk this gives the set of "data paths" the list/compare tools
/// operate on.
pub fn attributed_groups(store: &dyn HierStore, root: &Path) -> Vec<Path> {
    walk(store, root, WalkKind::Groups)
        .into_paths()
        .into_iter()
        .filter(|path| {
            store
                .read_attrs(path)
                .map(|attrs| !attrs.is_empty())
                .unwrap_or(false)
        })
        .collect()
}

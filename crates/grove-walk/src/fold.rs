//! Display folding: collapse deep or explicitly-named subtrees.
//!
//! Folding only affects how a path list is rendered. A folded subtree shows
//! up once, as its prefix followed by the fold symbol, instead of one line
//! per descendant.

use std::collections::BTreeSet;

use grove_path::Path;

/// Default marker appended to a folded prefix.
pub const FOLD_SYMBOL: &str = "/...";

/// Folding rules for rendering a path list.
#[derive(Clone, Debug, Default)]
pub struct FoldSpec {
    /// Fold everything deeper than this many segments below the root.
    pub max_depth: Option<usize>,
    /// Fold these subtrees regardless of depth.
    pub prefixes: Vec<Path>,
}

impl FoldSpec {
    /// Returns `true` when no folding is requested.
    pub fn is_empty(&self) -> bool {
        self.max_depth.is_none() && self.prefixes.is_empty()
    }
}

/// Render `paths` with folding applied, deduplicated and sorted.
pub fn folded(paths: &[Path], root: &Path, spec: &FoldSpec) -> Vec<String> {
    let mut out = BTreeSet::new();
    for path in paths {
        out.insert(render(path, root, spec));
    }
    out.into_iter().collect()
}

fn render(path: &Path, root: &Path, spec: &FoldSpec) -> String {
    for prefix in &spec.prefixes {
        if path.starts_with(prefix) {
            return format!("{prefix}{FOLD_SYMBOL}");
        }
    }
    if let Some(max_depth) = spec.max_depth {
        let limit = root.depth() + max_depth;
        if path.depth() > limit {
            return format!("{}{FOLD_SYMBOL}", path.truncate(limit));
        }
    }
    path.to_string()
}

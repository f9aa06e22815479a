//! Content-level comparison of matched dataset pairs.
//!
//! Equality strategy is selected per element kind: floats compare under a
//! caller-supplied absolute tolerance (0 means exact bit equality), all other
//! kinds compare exactly. Mixed element kinds are unequal, never an error;
//! mismatched shapes are an error so direct callers can tell the cases apart,
//! while batch callers fold both into "unequal".

use grove_path::Path;
use grove_store::{Elements, HierStore, NodeKind, Value};

use crate::error::{DiffError, DiffResult};
use crate::set_diff::{diff, Diff, PathSet, RenameMap};

fn floats_equal(x: f64, y: f64, tolerance: f64) -> bool {
    if tolerance == 0.0 {
        return x.to_bits() == y.to_bits();
    }
    (x - y).abs() <= tolerance
}

/// Element-wise equality of two values with equal shapes.
fn elements_equal(a: &Elements, b: &Elements, tolerance: f64) -> bool {
    match (a, b) {
        (Elements::Int(x), Elements::Int(y)) => x == y,
        (Elements::Str(x), Elements::Str(y)) => x == y,
        (Elements::Bool(x), Elements::Bool(y)) => x == y,
        (Elements::Float(x), Elements::Float(y)) => x
            .iter()
            .zip(y.iter())
            .all(|(&xv, &yv)| floats_equal(xv, yv, tolerance)),
        _ => false,
    }
}

fn values_equal(a: &Value, b: &Value, tolerance: f64) -> Option<bool> {
    if a.shape() != b.shape() {
        return None;
    }
    Some(elements_equal(a.elements(), b.elements(), tolerance))
}

/// Compare the datasets at `path_a` and `path_b` element-wise.
///
/// Reads both datasets fully into memory. Differing dimensions fail with
/// [`DiffError::ShapeMismatch`]; store read failures propagate.
pub fn equal_content(
    store_a: &dyn HierStore,
    path_a: &Path,
    store_b: &dyn HierStore,
    path_b: &Path,
    tolerance: f64,
) -> DiffResult<bool> {
    let a = store_a.read_dataset(path_a)?;
    let b = store_b.read_dataset(path_b)?;
    values_equal(&a, &b, tolerance).ok_or_else(|| DiffError::ShapeMismatch {
        path_a: path_a.clone(),
        path_b: path_b.clone(),
        shape_a: a.shape().to_vec(),
        shape_b: b.shape().to_vec(),
    })
}

/// Compare the attribute maps of two nodes: same keys, equal values under
/// the same tolerance rule. Shape mismatches in attribute values count as
/// unequal rather than failing.
pub fn equal_attrs(
    store_a: &dyn HierStore,
    path_a: &Path,
    store_b: &dyn HierStore,
    path_b: &Path,
    tolerance: f64,
) -> DiffResult<bool> {
    let a = store_a.read_attrs(path_a)?;
    let b = store_b.read_attrs(path_b)?;
    if a.len() != b.len() {
        return Ok(false);
    }
    for (key, value_a) in &a {
        match b.get(key) {
            Some(value_b) => {
                if values_equal(value_a, value_b, tolerance) != Some(true) {
                    return Ok(false);
                }
            }
            None => return Ok(false),
        }
    }
    Ok(true)
}

/// Full equality of a matched pair: node kinds, content, and attributes.
///
/// Two groups are equal when their attributes are; a group matched against a
/// dataset is unequal.
pub fn pair_equal(
    store_a: &dyn HierStore,
    path_a: &Path,
    store_b: &dyn HierStore,
    path_b: &Path,
    tolerance: f64,
) -> DiffResult<bool> {
    let kind_a = store_a.kind_of(path_a)?;
    let kind_b = store_b.kind_of(path_b)?;
    match (kind_a, kind_b) {
        (Some(NodeKind::Group), Some(NodeKind::Group)) => {
            equal_attrs(store_a, path_a, store_b, path_b, tolerance)
        }
        (Some(NodeKind::Dataset), Some(NodeKind::Dataset)) => {
            if !equal_attrs(store_a, path_a, store_b, path_b, tolerance)? {
                return Ok(false);
            }
            equal_content(store_a, path_a, store_b, path_b, tolerance)
        }
        _ => Ok(false),
    }
}

/// Evaluate each pair independently; return the first-store paths that are
/// NOT equal. A read failure or shape mismatch on one pair records that pair
/// unequal and does not abort the rest.
pub fn all_equal(
    pairs: &[(Path, Path)],
    store_a: &dyn HierStore,
    store_b: &dyn HierStore,
    tolerance: f64,
) -> PathSet {
    let mut unequal = PathSet::new();
    for (path_a, path_b) in pairs {
        match pair_equal(store_a, path_a, store_b, path_b, tolerance) {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                unequal.insert(path_a.clone());
            }
        }
    }
    unequal
}

/// Set diff plus content comparison of every matched pair.
///
/// For a renamed match the source-store path is recovered through the rename
/// map, so the pair compared is (old path in `store_a`, new path in
/// `store_b`). A rename whose old path is absent from `a` was never applied
/// and is not reverse-mapped. `unequal_content` entries use the post-rename
/// form, matching `in_both`.
pub fn deep_diff(
    store_a: &dyn HierStore,
    store_b: &dyn HierStore,
    a: &PathSet,
    b: &PathSet,
    renames: &RenameMap,
    tolerance: f64,
) -> DiffResult<Diff> {
    let mut result = diff(a, b, renames)?;
    for path in &result.in_both {
        let source_path = renames
            .source_of(path)
            .filter(|old| a.contains(*old))
            .unwrap_or(path);
        match pair_equal(store_a, source_path, store_b, path, tolerance) {
            Ok(true) => {}
            Ok(false) | Err(_) => result.unequal_content.push(path.clone()),
        }
    }
    Ok(result)
}

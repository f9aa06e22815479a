//! Comparison engine for hierarchical stores.
//!
//! Two layers:
//!
//! - [`diff`] -- presence/absence diff of two path sets, with rename-aware
//!   matching ([`RenameMap`])
//! - [`equal_content`] / [`all_equal`] / [`deep_diff`] -- element-wise
//!   content equality with a numeric tolerance, layered on the set diff
//!
//! Every result field is sorted ascending so repeated runs produce identical
//! reports.

pub mod content;
pub mod error;
pub mod set_diff;

pub use content::{all_equal, deep_diff, equal_attrs, equal_content, pair_equal};
pub use error::{DiffError, DiffResult};
pub use set_diff::{diff, Diff, PathSet, RenameMap};

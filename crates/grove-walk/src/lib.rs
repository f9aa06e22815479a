//! Traversal and selection of store hierarchies.
//!
//! # Key Functions
//!
//! - [`walk`] -- deterministic, tolerant depth-first traversal producing a
//!   re-enumerable [`Walk`] sequence
//! - [`PathFilter`] -- glob/regex filtering of walked paths
//! - [`folded`] -- display folding (max depth / explicit prefixes)
//! - [`verify`] -- try reading every dataset, partition readable/unreadable

pub mod error;
pub mod filter;
pub mod fold;
pub mod verify;
pub mod walk;

pub use error::{WalkError, WalkResult};
pub use filter::{PathFilter, PatternMode};
pub use fold::{folded, FoldSpec, FOLD_SYMBOL};
pub use verify::{verify, VerifyReport};
pub use walk::{attributed_groups, walk, Unreadable, Walk, WalkKind};

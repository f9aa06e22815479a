//! Copying between hierarchical stores.
//!
//! # Key Types
//!
//! - [`CopySpec`] / [`ConflictPolicy`] / [`CopyReport`] -- selective copy of
//!   (destination, source) pairs with skip/overwrite/fail conflict handling
//! - [`repair`] -- corruption-tolerant salvage into a fresh store
//! - [`repack`] -- in-place rewrite of a store file

pub mod copy;
pub mod error;
pub mod repair;
pub mod repack;

pub use copy::{copy, copy_tree, ConflictPolicy, CopyReport, CopySpec};
pub use error::{CopyError, CopyResult};
pub use repack::{repack, COMPRESS_LEVEL};
pub use repair::{repair, RepairReport};

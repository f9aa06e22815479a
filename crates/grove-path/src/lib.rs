//! Path handling for hierarchical stores.
//!
//! A store addresses its contents by absolute, `/`-separated paths. This
//! crate provides the [`Path`] value type used by every other grove crate:
//! parsing with normalization, joining, and prefix/ancestor queries.
//!
//! Parsing is the only constructor, so a `Path` held anywhere in the system
//! is always in normal form.

pub mod error;
pub mod path;

pub use error::{PathError, PathResult};
pub use path::{Path, SEPARATOR};

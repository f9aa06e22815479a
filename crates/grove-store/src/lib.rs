//! Hierarchical array store abstraction for grove.
//!
//! A store is a tree of named groups and datasets, where a dataset is a
//! shaped, typed array with attributes. This crate defines the data model
//! and the [`HierStore`] trait that every grove tool operates against, plus
//! two backends:
//!
//! - [`MemoryStore`] -- insertion-ordered in-memory tree for tests and
//!   embedding, with per-path corruption injection.
//! - [`FileStore`] -- checksummed, compressed snapshot file, so the CLI
//!   tools operate on real files.
//!
//! # Design Rules
//!
//! 1. Child order is the store's native order and is stable across calls.
//! 2. Handle lifecycle (open/close/save) belongs to the caller.
//! 3. All I/O errors are propagated, never silently ignored.
//! 4. The core performs no locking beyond interior mutability; concurrent
//!    use of one handle is the caller's problem.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;
pub mod value;

pub use error::{StoreError, StoreResult};
pub use file::{FileStore, OpenMode, DEFAULT_LEVEL};
pub use memory::MemoryStore;
pub use traits::HierStore;
pub use value::{Attributes, ElementKind, Elements, NodeKind, Value};

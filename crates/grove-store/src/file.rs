//! File-backed store: a checksummed, compressed snapshot container.
//!
//! The whole tree is serialized with bincode, zstd-compressed, and framed
//! with a magic tag plus a CRC32 of the compressed payload. The checksum is
//! what lets `grove check` distinguish a corrupted file from a readable one.
//!
//! This is a snapshot backend, not a native array format: [`HierStore`] is
//! the seam where a binding to one would plug in instead.

use std::fs;
use std::io::Write;
use std::path::{Path as FsPath, PathBuf};

use tracing::debug;

use grove_path::Path;

use crate::error::{StoreError, StoreResult};
use crate::memory::{MemoryStore, Node};
use crate::traits::HierStore;
use crate::value::{Attributes, NodeKind, Value};

const MAGIC: &[u8; 4] = b"GRV1";

/// Default zstd compression level for saved files.
pub const DEFAULT_LEVEL: i32 = 3;

/// How to open a file-backed store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    /// Existing file, writes rejected.
    Read,
    /// Existing file, writes allowed.
    ReadWrite,
    /// Fresh empty store; the file is written on the first `save`.
    Truncate,
}

/// A hierarchical store persisted as a single snapshot file.
///
/// Mutations happen in memory; [`FileStore::save`] writes the container
/// atomically (temp file in the same directory, then rename).
pub struct FileStore {
    inner: MemoryStore,
    file: PathBuf,
    mode: OpenMode,
    level: i32,
}

impl FileStore {
    /// Open (or create, with [`OpenMode::Truncate`]) a store file.
    pub fn open(file: impl Into<PathBuf>, mode: OpenMode) -> StoreResult<Self> {
        let file = file.into();
        let inner = match mode {
            OpenMode::Truncate => MemoryStore::new(),
            OpenMode::Read | OpenMode::ReadWrite => {
                let node = load_container(&file)?;
                MemoryStore::from_node(node)
            }
        };
        debug!(file = %file.display(), ?mode, "opened store");
        Ok(Self {
            inner,
            file,
            mode,
            level: DEFAULT_LEVEL,
        })
    }

    /// The backing file path.
    pub fn file(&self) -> &FsPath {
        &self.file
    }

    /// Set the zstd compression level used by `save`.
    pub fn set_compression(&mut self, level: i32) {
        self.level = level;
    }

    /// Persist the current tree to the backing file, atomically.
    pub fn save(&self) -> StoreResult<()> {
        if self.mode == OpenMode::Read {
            return Err(StoreError::ReadOnly);
        }
        let node = self.inner.to_node();
        write_container(&self.file, &node, self.level)?;
        debug!(file = %self.file.display(), "saved store");
        Ok(())
    }

    fn writable(&self) -> StoreResult<()> {
        if self.mode == OpenMode::Read {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

fn load_container(file: &FsPath) -> StoreResult<Node> {
    let bytes = fs::read(file)?;
    if bytes.len() < 8 || &bytes[..4] != MAGIC {
        return Err(StoreError::CorruptFile {
            file: file.to_path_buf(),
            reason: "missing container magic".into(),
        });
    }
    let stored_crc = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let payload = &bytes[8..];
    let computed = crc32fast::hash(payload);
    if computed != stored_crc {
        return Err(StoreError::CorruptFile {
            file: file.to_path_buf(),
            reason: format!("checksum mismatch: stored {stored_crc:08x}, computed {computed:08x}"),
        });
    }
    let raw = zstd::decode_all(payload).map_err(|e| StoreError::CorruptFile {
        file: file.to_path_buf(),
        reason: format!("decompression failed: {e}"),
    })?;
    bincode::deserialize(&raw).map_err(|e| StoreError::CorruptFile {
        file: file.to_path_buf(),
        reason: format!("decode failed: {e}"),
    })
}

fn write_container(file: &FsPath, node: &Node, level: i32) -> StoreResult<()> {
    let raw = bincode::serialize(node).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let payload = zstd::encode_all(&raw[..], level).map_err(StoreError::Io)?;
    let crc = crc32fast::hash(&payload);

    let dir = file.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new_in(".")?,
    };
    tmp.write_all(MAGIC)?;
    tmp.write_all(&crc.to_le_bytes())?;
    tmp.write_all(&payload)?;
    tmp.flush()?;
    tmp.persist(file).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

impl HierStore for FileStore {
    fn kind_of(&self, path: &Path) -> StoreResult<Option<NodeKind>> {
        self.inner.kind_of(path)
    }

    fn list_children(&self, path: &Path) -> StoreResult<Vec<(String, NodeKind)>> {
        self.inner.list_children(path)
    }

    fn read_dataset(&self, path: &Path) -> StoreResult<Value> {
        self.inner.read_dataset(path)
    }

    fn write_dataset(&self, path: &Path, value: Value) -> StoreResult<()> {
        self.writable()?;
        self.inner.write_dataset(path, value)
    }

    fn read_attrs(&self, path: &Path) -> StoreResult<Attributes> {
        self.inner.read_attrs(path)
    }

    fn write_attrs(&self, path: &Path, attrs: Attributes) -> StoreResult<()> {
        self.writable()?;
        self.inner.write_attrs(path, attrs)
    }

    fn create_group(&self, path: &Path) -> StoreResult<()> {
        self.writable()?;
        self.inner.create_group(path)
    }

    fn remove(&self, path: &Path) -> StoreResult<()> {
        self.writable()?;
        self.inner.remove(path)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("file", &self.file)
            .field("mode", &self.mode)
            .finish()
    }
}

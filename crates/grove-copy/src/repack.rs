//! Rewrite a store file in place.
//!
//! Repacking reads the whole tree and writes it back fresh, dropping any
//! slack the container accumulated. The rewrite goes through the store's
//! atomic save (temp file, then rename), so an interrupted repack leaves the
//! original file intact.

use std::path::Path as FsPath;

use tracing::info;

use grove_store::{FileStore, OpenMode};

use crate::copy::{copy_tree, CopyReport};
use crate::error::CopyResult;

/// zstd level used for `--compress` repacks.
pub const COMPRESS_LEVEL: i32 = 19;

/// Rewrite `file` through a fresh container, optionally recompressing at a
/// higher level. Returns what was written.
pub fn repack(file: impl AsRef<FsPath>, compress: bool) -> CopyResult<CopyReport> {
    let file = file.as_ref();
    let source = FileStore::open(file, OpenMode::Read)?;
    let mut dest = FileStore::open(file, OpenMode::Truncate)?;
    if compress {
        dest.set_compression(COMPRESS_LEVEL);
    }
    let report = copy_tree(&source, &dest)?;
    dest.save()?;
    info!(file = %file.display(), paths = report.copied.len(), compress, "repacked");
    Ok(report)
}

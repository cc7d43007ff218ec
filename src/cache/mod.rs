//! Local persistence for opscat
//!
//! Two caches live under the tool's cache directory: a persistent
//! key-value store with per-entry expiry (backing the instance directory)
//! and an on-disk mirror of object-store content. Both write through an
//! atomic temp-file-plus-rename so concurrent invocations of the tool can
//! at worst duplicate work, never observe a torn file.

mod manager;
mod objects;

pub use manager::{CacheManager, CachedData};
pub use objects::{ObjectCache, ObjectCacheError};

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Writes `bytes` to `path` atomically, creating parent directories.
///
/// The data lands in a process-unique temp file next to the destination
/// and is renamed into place, so a failed write leaves either the old
/// file or nothing, never a partial one.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "destination has no parent directory",
        )
    })?;
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("entry");
    let tmp = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

//! On-disk mirror of object-store content
//!
//! Remote objects are written once under the cache root, mirroring the
//! remote path hierarchy verbatim, and treated as immutable afterwards.
//! That is correct because output paths are per-invocation and never
//! overwritten in place; nothing here expires or revalidates a local
//! copy, cleanup is manual.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use encoding_rs::Encoding;
use thiserror::Error;
use tracing::debug;

use crate::data::{ObjectStore, ObjectStoreError};
use crate::encoding::{decode, detect_encoding, DecodeError};

/// Errors that can occur when fetching an object through the cache
#[derive(Debug, Error)]
pub enum ObjectCacheError {
    /// The path cannot be mirrored safely under the cache root
    #[error("invalid object path '{0}'")]
    InvalidPath(String),

    /// The remote read failed; nothing was written locally
    #[error("failed to fetch '{path}': {source}")]
    Fetch {
        path: String,
        source: ObjectStoreError,
    },

    /// Reading or writing the local copy failed
    #[error("cache I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },

    /// The detector produced no encoding guess for the cached bytes
    #[error("could not determine the text encoding of '{0}'")]
    UnknownEncoding(String),

    /// The cached bytes are inconsistent with the detected encoding
    #[error("failed to decode '{path}': {source}")]
    Decode { path: String, source: DecodeError },
}

/// Fetches object-store content through a local file mirror
///
/// For a given path the remote store is read at most once per cache root;
/// later calls (including from separate invocations of the tool) decode
/// the already-persisted file. Failed fetches are all-or-nothing and the
/// bytes of a file that fails to decode stay on disk for inspection.
pub struct ObjectCache<S> {
    root: PathBuf,
    store: S,
}

impl<S: ObjectStore> ObjectCache<S> {
    pub fn new(root: PathBuf, store: S) -> Self {
        Self { root, store }
    }

    /// The underlying object-store collaborator, for prefix listings
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Local file backing `path`, mirroring the remote hierarchy
    ///
    /// Only plain relative components are accepted; anything that could
    /// escape the cache root (absolute paths, `..`) is rejected.
    fn local_path(&self, path: &str) -> Result<PathBuf, ObjectCacheError> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(ObjectCacheError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Returns the decoded text of the object at `path`, fetching and
    /// persisting it locally on first access.
    pub async fn fetch(&self, path: &str) -> Result<String, ObjectCacheError> {
        let io_error = |source| ObjectCacheError::Io {
            path: path.to_string(),
            source,
        };

        let local = self.local_path(path)?;
        if local.exists() {
            debug!(path, "serving object from local cache");
        } else {
            debug!(path, "object not cached locally, fetching");
            let bytes = self
                .store
                .read(path)
                .await
                .map_err(|source| ObjectCacheError::Fetch {
                    path: path.to_string(),
                    source,
                })?;
            super::write_atomic(&local, &bytes).map_err(io_error)?;
        }

        let file = File::open(&local).map_err(io_error)?;
        let encoding: &'static Encoding = detect_encoding(BufReader::new(file))
            .map_err(io_error)?
            .ok_or_else(|| ObjectCacheError::UnknownEncoding(path.to_string()))?;

        let bytes = fs::read(&local).map_err(io_error)?;
        decode(&bytes, encoding).map_err(|source| ObjectCacheError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

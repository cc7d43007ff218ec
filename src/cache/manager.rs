//! Persistent key-value store with per-entry expiry
//!
//! Provides a `CacheManager` that stores serializable data to JSON files
//! stamped with an expiry timestamp. Expired entries are still returned
//! (with `is_expired = true`) so callers decide whether staleness is
//! acceptable for their use case.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Result of reading from the store, including freshness metadata
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    #[allow(dead_code)]
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Manages reading and writing expiring entries to disk
///
/// Each entry is one JSON file named after its key inside the store
/// directory. Writes are atomic, so a concurrently running invocation of
/// the tool never reads a torn entry.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where entries are stored
    store_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager over the given store directory
    ///
    /// The directory is created lazily on first write; callers resolve the
    /// location (see `Config`) and pass it in explicitly.
    pub fn new(store_dir: PathBuf) -> Self {
        Self { store_dir }
    }

    /// Returns the path to the entry file for the given key
    fn entry_path(&self, key: &str) -> PathBuf {
        self.store_dir.join(format!("{}.json", key))
    }

    /// Writes data to the store with a time-to-live in seconds
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the entry (e.g., "instance_info")
    /// * `data` - The data to cache (must implement Serialize)
    /// * `ttl_secs` - How long the entry should be considered fresh
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl_secs: u64) -> std::io::Result<()> {
        let now = Utc::now();
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at: now + Duration::seconds(ttl_secs as i64),
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        super::write_atomic(&self.entry_path(key), json.as_bytes())
    }

    /// Reads an entry from the store
    ///
    /// Returns `None` if the entry doesn't exist or cannot be parsed.
    /// Returns `Some(CachedData)` with `is_expired = true` if the entry
    /// exists but its TTL has elapsed; whether to use such an entry is the
    /// caller's call.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let path = self.entry_path(key);
        let content = fs::read_to_string(path).ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;

        let now = Utc::now();
        let is_expired = now > entry.expires_at;

        Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired,
        })
    }
}

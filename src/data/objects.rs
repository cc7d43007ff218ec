//! Object-store access
//!
//! The store is addressed by fully-qualified paths of the form
//! `bucket/key`. The trait keeps the rest of the crate independent of the
//! HTTP transport, which is what lets the cache tests run against an
//! in-memory store.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when reading from the object store
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// No object exists at the requested path
    #[error("object not found: {0}")]
    NotFound(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse the listing response
    #[error("Failed to parse listing response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Read-only view of the remote object store
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Reads the full contents of the object at `path` (`bucket/key`).
    async fn read(&self, path: &str) -> Result<Vec<u8>, ObjectStoreError>;

    /// Lists fully-qualified paths of all objects under `bucket`/`prefix`.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, ObjectStoreError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListObjectsResponse {
    #[serde(default)]
    contents: Vec<ObjectEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectEntry {
    key: String,
}

/// HTTP-backed object store client
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: Client,
    base_url: String,
}

impl HttpObjectStore {
    /// Creates a new store client against the given service base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl ObjectStore for HttpObjectStore {
    async fn read(&self, path: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let url = format!("{}/objects/{}", self.base_url, path);
        debug!(path, "reading object");

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ObjectStoreError::NotFound(path.to_string()));
        }
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        let url = format!("{}/objects/{}", self.base_url, bucket);
        debug!(bucket, prefix, "listing objects");

        let response = self
            .client
            .get(&url)
            .query(&[("prefix", prefix)])
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        let parsed: ListObjectsResponse = serde_json::from_str(&text)?;
        Ok(parsed
            .contents
            .into_iter()
            .map(|entry| format!("{}/{}", bucket, entry.key))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_response_parses_keys() {
        let json = r#"{
            "Contents": [
                {"Key": "cmd-1/i-aaa/stdout"},
                {"Key": "cmd-1/i-aaa/stderr"}
            ]
        }"#;
        let parsed: ListObjectsResponse = serde_json::from_str(json).expect("listing must parse");
        assert_eq!(parsed.contents.len(), 2);
        assert_eq!(parsed.contents[0].key, "cmd-1/i-aaa/stdout");
    }

    #[test]
    fn test_empty_listing_response_parses() {
        let parsed: ListObjectsResponse = serde_json::from_str("{}").expect("must parse");
        assert!(parsed.contents.is_empty());
    }
}

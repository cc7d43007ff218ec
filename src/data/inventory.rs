//! Compute-inventory client and the cached instance directory
//!
//! The inventory call enumerates every instance the account knows about,
//! so the directory caches the projected mapping as a single unit: one
//! call serves an entire listing or detail invocation, and the whole
//! mapping expires together after the TTL.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::CacheManager;
use crate::data::InstanceInfo;

/// Store key under which the whole instance mapping is cached
const INSTANCE_INFO_KEY: &str = "instance_info";

/// How long a cached instance mapping stays fresh
const INSTANCE_INFO_TTL_SECS: u64 = 300;

/// Errors that can occur when fetching instance metadata
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse the inventory response
    #[error("Failed to parse inventory response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A single instance record as returned by the inventory service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceRecord {
    /// Instance id; records without one are unaddressable and get skipped
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Display name tag
    #[serde(default)]
    pub name: Option<String>,
    /// Private network address
    #[serde(default)]
    pub private_ip_address: Option<String>,
    /// Public network address
    #[serde(default)]
    pub public_ip_address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstancesResponse {
    #[serde(default)]
    instances: Vec<InstanceRecord>,
}

/// Inventory collaborator seam; lets tests drive the directory without a network
#[allow(async_fn_in_trait)]
pub trait Inventory {
    /// Enumerates all known compute instances.
    async fn describe_instances(&self) -> Result<Vec<InstanceRecord>, InventoryError>;
}

/// HTTP-backed inventory client
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    client: Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// Creates a new client against the given service base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Inventory for HttpInventoryClient {
    async fn describe_instances(&self) -> Result<Vec<InstanceRecord>, InventoryError> {
        let url = format!("{}/instances", self.base_url);
        debug!(%url, "describing instances");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let text = response.text().await?;
        let parsed: DescribeInstancesResponse = serde_json::from_str(&text)?;
        Ok(parsed.instances)
    }
}

/// TTL-cached mapping from instance id to its descriptive fields
///
/// Reads go to the persistent store first; the inventory service is only
/// called when the stored mapping is missing or has expired. An inventory
/// failure propagates to the caller rather than serving stale data.
pub struct InstanceDirectory<I> {
    inventory: I,
    cache: CacheManager,
}

impl<I: Inventory> InstanceDirectory<I> {
    pub fn new(inventory: I, cache: CacheManager) -> Self {
        Self { inventory, cache }
    }

    /// Returns the instance mapping, refreshing it from the inventory
    /// service only when the cached copy is missing or expired.
    pub async fn get(&self) -> Result<HashMap<String, InstanceInfo>, InventoryError> {
        if let Some(cached) = self
            .cache
            .read::<HashMap<String, InstanceInfo>>(INSTANCE_INFO_KEY)
        {
            if !cached.is_expired {
                debug!("instance directory served from cache");
                return Ok(cached.data);
            }
        }

        let records = self.inventory.describe_instances().await?;
        let mapping: HashMap<String, InstanceInfo> = records
            .into_iter()
            .filter_map(|record| {
                let id = record.instance_id?;
                Some((
                    id,
                    InstanceInfo {
                        name: record.name,
                        private_ip: record.private_ip_address,
                        public_ip: record.public_ip_address,
                    },
                ))
            })
            .collect();

        if let Err(err) = self
            .cache
            .write(INSTANCE_INFO_KEY, &mapping, INSTANCE_INFO_TTL_SECS)
        {
            // The mapping is still usable for this invocation; the next one
            // just pays for another inventory call.
            warn!("failed to persist instance directory: {err}");
        }
        Ok(mapping)
    }
}

//! Domain types and service clients for opscat
//!
//! This module contains the data types shared across the application for
//! representing issued commands, their per-instance invocations, and
//! compute-instance metadata, plus the HTTP clients that speak to the
//! remote service.

pub mod commands;
pub mod inventory;
pub mod objects;

pub use commands::{CommandServiceClient, CommandServiceError};
pub use inventory::{HttpInventoryClient, InstanceDirectory, Inventory, InventoryError};
pub use objects::{HttpObjectStore, ObjectStore, ObjectStoreError};

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single key/value filter understood by the command service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandFilter {
    /// Which bound this filter constrains
    #[serde(rename = "Key")]
    pub key: FilterKey,
    /// Serialized ISO-8601 UTC instant
    #[serde(rename = "Value")]
    pub value: String,
}

impl CommandFilter {
    pub fn new(key: FilterKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Filter keys accepted by the command-listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterKey {
    InvokedAfter,
    InvokedBefore,
}

/// Lifecycle status reported by the command service
///
/// The `Unknown` catch-all keeps deserialization working when the service
/// introduces statuses this tool does not know about yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum CommandStatus {
    Pending,
    InProgress,
    Success,
    Failed,
    Cancelled,
    TimedOut,
    Unknown,
}

impl From<String> for CommandStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => CommandStatus::Pending,
            "InProgress" => CommandStatus::InProgress,
            "Success" => CommandStatus::Success,
            "Failed" => CommandStatus::Failed,
            "Cancelled" => CommandStatus::Cancelled,
            "TimedOut" => CommandStatus::TimedOut,
            _ => CommandStatus::Unknown,
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CommandStatus::Pending => "Pending",
            CommandStatus::InProgress => "InProgress",
            CommandStatus::Success => "Success",
            CommandStatus::Failed => "Failed",
            CommandStatus::Cancelled => "Cancelled",
            CommandStatus::TimedOut => "TimedOut",
            CommandStatus::Unknown => "Unknown",
        };
        f.pad(label)
    }
}

/// Summary row for one issued command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandSummary {
    /// Service-assigned command id
    pub command_id: String,
    /// Aggregate status across all targets
    pub status: CommandStatus,
    /// When the command was requested
    pub requested_date_time: DateTime<Utc>,
    /// Ids of the targeted instances
    #[serde(default)]
    pub instance_ids: Vec<String>,
    /// Parameters the command was invoked with
    #[serde(default)]
    pub parameters: HashMap<String, Vec<String>>,
}

/// One target instance's execution record for a command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandInvocation {
    /// The instance this invocation ran on
    pub instance_id: String,
    /// Invocation status on this instance
    pub status: CommandStatus,
    /// Per-plugin results, in execution order
    #[serde(default, rename = "CommandPlugins")]
    pub plugins: Vec<PluginResult>,
}

/// The outcome of one plugin step within an invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginResult {
    /// Plugin name, when the service reports one
    #[serde(default)]
    pub name: Option<String>,
    /// Plugin status on this instance
    pub status: CommandStatus,
    /// Inline output text (possibly truncated by the service)
    #[serde(default)]
    pub output: String,
    /// Object-store bucket the full output was mirrored to, if any
    #[serde(default, rename = "OutputBucketName")]
    pub output_bucket: Option<String>,
    /// Key prefix under which the output files live
    #[serde(default, rename = "OutputKeyPrefix")]
    pub output_prefix: Option<String>,
}

/// Descriptive fields for one compute instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceInfo {
    /// Display name, when the instance carries a name tag
    pub name: Option<String>,
    /// Private network address
    pub private_ip: Option<String>,
    /// Public network address
    pub public_ip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_serializes_with_pascal_case_wire_names() {
        let filter = CommandFilter::new(FilterKey::InvokedAfter, "2024-01-01T10:00:00Z");
        let json = serde_json::to_string(&filter).expect("filter must serialize");
        assert_eq!(
            json,
            r#"{"Key":"InvokedAfter","Value":"2024-01-01T10:00:00Z"}"#
        );
    }

    #[test]
    fn test_command_summary_deserializes_from_wire_shape() {
        let json = r#"{
            "CommandId": "cmd-0123",
            "Status": "Success",
            "RequestedDateTime": "2024-01-01T09:30:00Z",
            "InstanceIds": ["i-aaa", "i-bbb"],
            "Parameters": {"commands": ["uptime"]}
        }"#;
        let summary: CommandSummary = serde_json::from_str(json).expect("summary must parse");
        assert_eq!(summary.command_id, "cmd-0123");
        assert_eq!(summary.status, CommandStatus::Success);
        assert_eq!(summary.instance_ids.len(), 2);
        assert_eq!(summary.parameters["commands"], vec!["uptime"]);
    }

    #[test]
    fn test_unknown_status_falls_back_instead_of_failing() {
        let json = r#"{
            "CommandId": "cmd-0123",
            "Status": "SomethingNew",
            "RequestedDateTime": "2024-01-01T09:30:00Z"
        }"#;
        let summary: CommandSummary = serde_json::from_str(json).expect("summary must parse");
        assert_eq!(summary.status, CommandStatus::Unknown);
        assert!(summary.instance_ids.is_empty());
    }

    #[test]
    fn test_plugin_result_with_and_without_mirror_location() {
        let json = r#"{
            "Name": "runShellScript",
            "Status": "Success",
            "Output": "hello\n",
            "OutputBucketName": "ops-logs",
            "OutputKeyPrefix": "cmd-0123"
        }"#;
        let plugin: PluginResult = serde_json::from_str(json).expect("plugin must parse");
        assert_eq!(plugin.output_bucket.as_deref(), Some("ops-logs"));
        assert_eq!(plugin.output_prefix.as_deref(), Some("cmd-0123"));

        let inline_only = r#"{"Status": "Failed", "Output": "boom"}"#;
        let plugin: PluginResult = serde_json::from_str(inline_only).expect("plugin must parse");
        assert!(plugin.output_bucket.is_none());
        assert_eq!(plugin.output, "boom");
    }

    #[test]
    fn test_command_status_display_matches_wire_labels() {
        assert_eq!(CommandStatus::InProgress.to_string(), "InProgress");
        assert_eq!(CommandStatus::TimedOut.to_string(), "TimedOut");
    }
}

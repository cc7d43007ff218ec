//! Command-service API client
//!
//! Lists recently issued commands and the per-instance invocation details
//! for a single command. Both calls are bounded to one page of results;
//! this tool is for eyeballing recent activity, not exporting history.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{CommandFilter, CommandInvocation, CommandSummary};

/// Page size for both listing endpoints
const MAX_RESULTS: u32 = 50;

/// Errors that can occur when talking to the command service
#[derive(Debug, Error)]
pub enum CommandServiceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse the service response
    #[error("Failed to parse service response: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ListCommandsRequest<'a> {
    max_results: u32,
    filters: &'a [CommandFilter],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListCommandsResponse {
    #[serde(default)]
    commands: Vec<CommandSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ListInvocationsRequest<'a> {
    command_id: &'a str,
    details: bool,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListInvocationsResponse {
    #[serde(default)]
    command_invocations: Vec<CommandInvocation>,
}

/// Client for the remote command-execution service
#[derive(Debug, Clone)]
pub struct CommandServiceClient {
    client: Client,
    base_url: String,
}

impl CommandServiceClient {
    /// Creates a new client against the given service base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Lists commands matching the given window filters
    pub async fn list_commands(
        &self,
        filters: &[CommandFilter],
    ) -> Result<Vec<CommandSummary>, CommandServiceError> {
        let url = format!("{}/commands/list", self.base_url);
        let body = ListCommandsRequest {
            max_results: MAX_RESULTS,
            filters,
        };
        debug!(%url, filters = filters.len(), "listing commands");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        let parsed: ListCommandsResponse = serde_json::from_str(&text)?;
        Ok(parsed.commands)
    }

    /// Lists detailed per-instance invocations for one command
    pub async fn list_invocations(
        &self,
        command_id: &str,
    ) -> Result<Vec<CommandInvocation>, CommandServiceError> {
        let url = format!("{}/commands/invocations", self.base_url);
        let body = ListInvocationsRequest {
            command_id,
            details: true,
            max_results: MAX_RESULTS,
        };
        debug!(%url, command_id, "listing invocations");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        let parsed: ListInvocationsResponse = serde_json::from_str(&text)?;
        Ok(parsed.command_invocations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CommandStatus, FilterKey};

    #[test]
    fn test_list_commands_request_wire_shape() {
        let filters = vec![CommandFilter::new(
            FilterKey::InvokedAfter,
            "2024-01-01T10:00:00Z",
        )];
        let body = ListCommandsRequest {
            max_results: MAX_RESULTS,
            filters: &filters,
        };
        let json = serde_json::to_value(&body).expect("request must serialize");
        assert_eq!(json["MaxResults"], 50);
        assert_eq!(json["Filters"][0]["Key"], "InvokedAfter");
        assert_eq!(json["Filters"][0]["Value"], "2024-01-01T10:00:00Z");
    }

    #[test]
    fn test_list_invocations_request_wire_shape() {
        let body = ListInvocationsRequest {
            command_id: "cmd-0123",
            details: true,
            max_results: MAX_RESULTS,
        };
        let json = serde_json::to_value(&body).expect("request must serialize");
        assert_eq!(json["CommandId"], "cmd-0123");
        assert_eq!(json["Details"], true);
        assert_eq!(json["MaxResults"], 50);
    }

    #[test]
    fn test_commands_response_parses_rows() {
        let json = r#"{
            "Commands": [
                {
                    "CommandId": "cmd-1",
                    "Status": "Success",
                    "RequestedDateTime": "2024-01-01T09:30:00Z",
                    "InstanceIds": ["i-aaa"],
                    "Parameters": {"commands": ["df -h"]}
                },
                {
                    "CommandId": "cmd-2",
                    "Status": "InProgress",
                    "RequestedDateTime": "2024-01-01T09:45:00Z"
                }
            ]
        }"#;
        let parsed: ListCommandsResponse = serde_json::from_str(json).expect("response must parse");
        assert_eq!(parsed.commands.len(), 2);
        assert_eq!(parsed.commands[1].status, CommandStatus::InProgress);
    }

    #[test]
    fn test_empty_commands_response_parses() {
        let parsed: ListCommandsResponse = serde_json::from_str("{}").expect("must parse");
        assert!(parsed.commands.is_empty());
    }

    #[test]
    fn test_invocations_response_parses_nested_plugins() {
        let json = r#"{
            "CommandInvocations": [
                {
                    "InstanceId": "i-aaa",
                    "Status": "Success",
                    "CommandPlugins": [
                        {
                            "Name": "runShellScript",
                            "Status": "Success",
                            "Output": "ok\n",
                            "OutputBucketName": "ops-logs",
                            "OutputKeyPrefix": "cmd-1"
                        }
                    ]
                }
            ]
        }"#;
        let parsed: ListInvocationsResponse =
            serde_json::from_str(json).expect("response must parse");
        assert_eq!(parsed.command_invocations.len(), 1);
        let invocation = &parsed.command_invocations[0];
        assert_eq!(invocation.instance_id, "i-aaa");
        assert_eq!(invocation.plugins.len(), 1);
        assert_eq!(
            invocation.plugins[0].output_bucket.as_deref(),
            Some("ops-logs")
        );
    }
}

//! Snapshot operation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{Tool, ToolResult, schema_value};
use super::{render_api_error, response_str};
use crate::client::{ApiClient, routes};

/// Capture a release snapshot of a project's current configuration.
pub struct SnapshotTool {
    client: Arc<ApiClient>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SnapshotInput {
    /// Project to snapshot.
    pub project: String,
    /// Snapshot name. Server-generated when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Release notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl SnapshotTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SnapshotTool {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn description(&self) -> &str {
        "Capture a release snapshot of a project's current configuration"
    }

    fn input_schema(&self) -> serde_json::Value {
        schema_value::<SnapshotInput>()
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let input: SnapshotInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return ToolResult::error(format!("Invalid input: {}", e)),
        };

        let mut body = serde_json::json!({ "project": input.project });
        if let Some(name) = input.name {
            body["name"] = name.into();
        }
        if let Some(notes) = input.notes {
            body["notes"] = notes.into();
        }

        match self
            .client
            .call(routes::SNAPSHOTS, Method::POST, Some(body))
            .await
        {
            Ok(response) => {
                let id = response_str(&response, "id", "unknown");
                ToolResult::success(format!("Snapshot {} created.", id))
            }
            Err(err) => ToolResult::error(render_api_error(&err)),
        }
    }
}

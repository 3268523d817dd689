//! Deploy operation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{Tool, ToolResult, schema_value};
use super::{render_api_error, response_str};
use crate::client::{ApiClient, routes};

/// Queue a deployment of a project into an environment.
pub struct DeployTool {
    client: Arc<ApiClient>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeployInput {
    /// Project to deploy.
    pub project: String,
    /// Environment to deploy into.
    pub environment: String,
    /// Snapshot to deploy. The server picks the latest when absent.
    #[serde(default)]
    pub snapshot_id: Option<String>,
    /// Free-form note attached to the deployment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl DeployTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeployTool {
    fn name(&self) -> &str {
        "deploy"
    }

    fn description(&self) -> &str {
        "Queue a deployment of a project into an environment"
    }

    fn input_schema(&self) -> serde_json::Value {
        schema_value::<DeployInput>()
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let input: DeployInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return ToolResult::error(format!("Invalid input: {}", e)),
        };

        let mut body = serde_json::json!({
            "project": input.project,
            "environment": input.environment,
        });
        if let Some(snapshot_id) = input.snapshot_id {
            body["snapshot_id"] = snapshot_id.into();
        }
        if let Some(comment) = input.comment {
            body["comment"] = comment.into();
        }

        match self
            .client
            .call(routes::DEPLOYMENTS, Method::POST, Some(body))
            .await
        {
            Ok(response) => {
                let id = response_str(&response, "id", "unknown");
                let status = response_str(&response, "status", "queued");
                ToolResult::success(format!("Deployment {} is {}.", id, status))
            }
            Err(err) => ToolResult::error(render_api_error(&err)),
        }
    }
}

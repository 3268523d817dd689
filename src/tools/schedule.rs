//! Schedule operation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{Tool, ToolResult, schema_value};
use super::{render_api_error, response_str};
use crate::client::{ApiClient, routes};

/// Schedule a deployment for a future time.
pub struct ScheduleTool {
    client: Arc<ApiClient>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScheduleInput {
    /// Project to deploy.
    pub project: String,
    /// Environment to deploy into.
    pub environment: String,
    /// Snapshot to deploy. The server picks the latest when absent.
    #[serde(default)]
    pub snapshot_id: Option<String>,
    /// When to run, RFC 3339 (e.g. `2026-09-01T02:00:00Z`).
    pub run_at: String,
}

impl ScheduleTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ScheduleTool {
    fn name(&self) -> &str {
        "schedule"
    }

    fn description(&self) -> &str {
        "Schedule a deployment for a future time"
    }

    fn input_schema(&self) -> serde_json::Value {
        schema_value::<ScheduleInput>()
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let input: ScheduleInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return ToolResult::error(format!("Invalid input: {}", e)),
        };

        let run_at = match DateTime::parse_from_rfc3339(&input.run_at) {
            Ok(run_at) => run_at,
            Err(e) => {
                return ToolResult::error(format!(
                    "Invalid input: run_at must be an RFC 3339 timestamp ({})",
                    e
                ));
            }
        };

        let mut body = serde_json::json!({
            "project": input.project,
            "environment": input.environment,
            "run_at": run_at.to_rfc3339(),
        });
        if let Some(snapshot_id) = input.snapshot_id {
            body["snapshot_id"] = snapshot_id.into();
        }

        match self
            .client
            .call(routes::SCHEDULES, Method::POST, Some(body))
            .await
        {
            Ok(response) => {
                let id = response_str(&response, "id", "unknown");
                ToolResult::success(format!(
                    "Deployment {} scheduled for {}.",
                    id,
                    run_at.to_rfc3339()
                ))
            }
            Err(err) => ToolResult::error(render_api_error(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    #[tokio::test]
    async fn test_bad_timestamp_is_rejected_before_any_call() {
        let client = Arc::new(
            ApiClient::new(GatewayConfig::new("http://127.0.0.1:9", "tok")).unwrap(),
        );
        let tool = ScheduleTool::new(client);

        let result = tool
            .execute(serde_json::json!({
                "project": "billing",
                "environment": "staging",
                "run_at": "tomorrow-ish",
            }))
            .await;

        assert!(result.is_error());
        assert!(result.text().contains("RFC 3339"));
    }
}

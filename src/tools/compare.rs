//! Compare operation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{Tool, ToolResult, schema_value};
use super::render_api_error;
use crate::client::{ApiClient, routes};

/// Diff two release snapshots.
pub struct CompareTool {
    client: Arc<ApiClient>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompareInput {
    /// Baseline snapshot id.
    pub left: String,
    /// Snapshot id to compare against the baseline.
    pub right: String,
}

impl CompareTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CompareTool {
    fn name(&self) -> &str {
        "compare"
    }

    fn description(&self) -> &str {
        "Diff two release snapshots"
    }

    fn input_schema(&self) -> serde_json::Value {
        schema_value::<CompareInput>()
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let input: CompareInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return ToolResult::error(format!("Invalid input: {}", e)),
        };

        let endpoint = routes::snapshot_compare(&input.left, &input.right);

        match self.client.call(&endpoint, Method::GET, None).await {
            Ok(response) => ToolResult::success(
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string()),
            ),
            Err(err) => ToolResult::error(render_api_error(&err)),
        }
    }
}

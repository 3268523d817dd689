//! Trigger operation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{Tool, ToolResult, schema_value};
use super::{render_api_error, response_str};
use crate::client::{ApiClient, routes};

/// Fire a server-side trigger by id.
pub struct TriggerTool {
    client: Arc<ApiClient>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TriggerInput {
    /// Trigger to fire.
    pub trigger_id: String,
}

impl TriggerTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for TriggerTool {
    fn name(&self) -> &str {
        "trigger"
    }

    fn description(&self) -> &str {
        "Fire a server-side trigger by id"
    }

    fn input_schema(&self) -> serde_json::Value {
        schema_value::<TriggerInput>()
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let input: TriggerInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return ToolResult::error(format!("Invalid input: {}", e)),
        };

        let endpoint = routes::trigger_runs(&input.trigger_id);

        match self.client.call(&endpoint, Method::POST, None).await {
            Ok(response) => {
                let run_id = response_str(&response, "id", "unknown");
                ToolResult::success(format!(
                    "Trigger {} fired; run {} started.",
                    input.trigger_id, run_id
                ))
            }
            Err(err) => ToolResult::error(render_api_error(&err)),
        }
    }
}

//! Inventory operation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{Tool, ToolResult, schema_value};
use super::render_api_error;
use crate::client::{ApiClient, routes};

/// List the deployment targets known to the server.
pub struct InventoryTool {
    client: Arc<ApiClient>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InventoryInput {
    /// Restrict the listing to one environment.
    #[serde(default)]
    pub environment: Option<String>,
}

impl InventoryTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for InventoryTool {
    fn name(&self) -> &str {
        "inventory"
    }

    fn description(&self) -> &str {
        "List the deployment targets known to the server"
    }

    fn input_schema(&self) -> serde_json::Value {
        schema_value::<InventoryInput>()
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let input: InventoryInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return ToolResult::error(format!("Invalid input: {}", e)),
        };

        let endpoint = match input.environment.as_deref() {
            Some(environment) => routes::targets_in(environment),
            None => routes::TARGETS.to_string(),
        };

        match self.client.call(&endpoint, Method::GET, None).await {
            Ok(response) => ToolResult::success(render_targets(&response)),
            Err(err) => ToolResult::error(render_api_error(&err)),
        }
    }
}

fn render_targets(response: &serde_json::Value) -> String {
    let items = response
        .get("items")
        .and_then(|v| v.as_array())
        .or_else(|| response.as_array());

    match items {
        Some(items) => {
            let mut lines = vec![format!("{} deployment target(s)", items.len())];
            for item in items {
                let name = item.get("name").and_then(|v| v.as_str()).unwrap_or("?");
                let environment = item
                    .get("environment")
                    .and_then(|v| v.as_str())
                    .unwrap_or("?");
                lines.push(format!("- {} ({})", name, environment));
            }
            lines.join("\n")
        }
        None => serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_targets_list() {
        let response = serde_json::json!({
            "items": [
                {"name": "web-01", "environment": "production"},
                {"name": "web-02", "environment": "staging"},
            ]
        });
        let rendered = render_targets(&response);
        assert!(rendered.starts_with("2 deployment target(s)"));
        assert!(rendered.contains("- web-01 (production)"));
    }

    #[test]
    fn test_render_targets_bare_array() {
        let response = serde_json::json!([{"name": "db-01", "environment": "production"}]);
        assert!(render_targets(&response).contains("db-01"));
    }
}

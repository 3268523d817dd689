//! Tool registry and trait definitions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;

use crate::client::ApiClient;

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub enum ToolResult {
    /// Successful result with rendered text.
    Success(String),
    /// Error result with a user-presentable message.
    Error(String),
}

impl ToolResult {
    /// Create a success result.
    pub fn success(content: impl Into<String>) -> Self {
        Self::Success(content.into())
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Check if this is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The rendered text, success or error alike.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }
}

/// Tool definition surfaced to the agent runtime.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Trait for tool implementations.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name.
    fn name(&self) -> &str;

    /// Get the tool description.
    fn description(&self) -> &str;

    /// Get the JSON schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, input: serde_json::Value) -> ToolResult;

    /// Get the tool definition for registration.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Derive the input schema for a typed tool input.
pub(crate) fn schema_value<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    let mut value =
        serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}));

    if let Some(obj) = value.as_object_mut()
        && !obj.contains_key("additionalProperties")
    {
        obj.insert(
            "additionalProperties".to_string(),
            serde_json::Value::Bool(false),
        );
    }

    value
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with every built-in operation registered.
    pub fn with_builtin(client: Arc<ApiClient>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::DeployTool::new(client.clone())));
        registry.register(Arc::new(super::SnapshotTool::new(client.clone())));
        registry.register(Arc::new(super::InventoryTool::new(client.clone())));
        registry.register(Arc::new(super::ScheduleTool::new(client.clone())));
        registry.register(Arc::new(super::CompareTool::new(client.clone())));
        registry.register(Arc::new(super::TriggerTool::new(client)));
        registry
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions for every registered tool, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, input: serde_json::Value) -> ToolResult {
        match self.get(name) {
            Some(tool) => tool.execute(input).await,
            None => ToolResult::error(format!("Unknown tool: {}", name)),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Domain tool layer: one thin handler per named operation.
//!
//! Each tool maps one-to-one onto a single HTTP call against the server's
//! REST surface: no branching, no retries, no cross-call state. Failure
//! rendering distinguishes every [`ApiError`] kind so the agent can report
//! "authentication failed" rather than a generic failure.

mod compare;
mod deploy;
mod inventory;
mod registry;
mod schedule;
mod snapshot;
mod trigger;

pub use compare::CompareTool;
pub use deploy::DeployTool;
pub use inventory::InventoryTool;
pub use registry::{Tool, ToolDefinition, ToolRegistry, ToolResult};
pub use schedule::ScheduleTool;
pub use snapshot::SnapshotTool;
pub use trigger::TriggerTool;

use crate::client::ApiError;

/// One user-presentable message per error kind.
pub(crate) fn render_api_error(err: &ApiError) -> String {
    match err {
        ApiError::Auth(reason) => format!("Authentication failed: {}", reason),
        ApiError::Network(cause) => format!("Could not reach the server: {}", cause),
        ApiError::Http {
            status,
            status_text,
        } => format!("Server returned HTTP {} {}", status, status_text),
        ApiError::Decode(cause) => format!("Server response was not valid JSON: {}", cause),
    }
}

/// Pull a string field out of a response object, with a fallback.
pub(crate) fn response_str<'a>(
    response: &'a serde_json::Value,
    field: &str,
    fallback: &'a str,
) -> &'a str {
    response.get(field).and_then(|v| v.as_str()).unwrap_or(fallback)
}

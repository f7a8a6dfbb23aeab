use serde_json::json;

use super::ToolDefinition;
use crate::checker::{CheckRequest, LinkChecker};
use crate::protocol::{CheckLinkParams, JsonRpcError, ToolResult};
use crate::schema;

pub const NAME: &str = "check-link";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.into(),
        description: "Check whether a URL is reachable by making an HTTP HEAD request.".into(),
        input_schema: json!({
            "type": "object",
            "required": ["url"],
            "properties": {
                "url": {
                    "type": "string",
                    "format": "uri",
                    "description": "The URL to check (must start with http:// or https://)"
                }
            }
        }),
    }
}

/// Handle a `check-link` tool call.
///
/// Argument problems are protocol errors. Anything that happens once the
/// probe is under way, unreachable hosts and timeouts included, comes back
/// as an ordinary text result.
pub async fn handle(
    arguments: Option<&serde_json::Value>,
    checker: &LinkChecker,
) -> Result<ToolResult, JsonRpcError> {
    let arguments = arguments
        .ok_or_else(|| JsonRpcError::invalid_params(format!("Missing arguments for {NAME}")))?;

    schema::validate_value(&definition().input_schema, arguments)?;

    let params: CheckLinkParams = serde_json::from_value(arguments.clone()).map_err(|e| {
        JsonRpcError::invalid_params(format!("Invalid arguments for {NAME}: {e}"))
    })?;

    let request = CheckRequest::parse(params.url)?;
    let verdict = checker.check(&request).await;

    Ok(ToolResult::text(verdict.render()))
}

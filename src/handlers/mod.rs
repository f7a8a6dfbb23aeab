pub mod check_link;

use serde::Serialize;

use crate::checker::LinkChecker;
use crate::protocol::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams, ToolResult,
};

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "link-checker";

/// Metadata advertised for a tool in `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Every tool this server registers, in advertised order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![check_link::definition()]
}

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(
    req: &JsonRpcRequest,
    checker: &LinkChecker,
) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            log_client(req);
            let result = serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let result = serde_json::json!({ "tools": tool_definitions() });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!(
                                "Invalid tools/call params: {e}"
                            )),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            let response = match dispatch_tool_call(&params, checker).await {
                Ok(tool_result) => {
                    let result_json = serde_json::to_value(&tool_result)
                        .expect("ToolResult must serialize to JSON Value");
                    JsonRpcResponse::success(req.id.clone(), result_json)
                }
                Err(err) => {
                    tracing::warn!(tool = %params.name, code = err.code, "tool call rejected: {}", err.message);
                    JsonRpcResponse::error(req.id.clone(), err)
                }
            };
            Some(response)
        }

        _ if req.is_notification() => {
            tracing::debug!(method = %req.method, "ignoring notification");
            None
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

async fn dispatch_tool_call(
    params: &ToolCallParams,
    checker: &LinkChecker,
) -> Result<ToolResult, JsonRpcError> {
    match params.name.as_str() {
        check_link::NAME => check_link::handle(params.arguments.as_ref(), checker).await,
        _ => Err(JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name))),
    }
}

fn log_client(req: &JsonRpcRequest) {
    let params: Option<InitializeParams> = req
        .params
        .as_ref()
        .and_then(|v| serde_json::from_value(v.clone()).ok());
    let Some(params) = params else {
        return;
    };
    let client = params.client_info.as_ref();
    tracing::info!(
        client = client.and_then(|c| c.name.as_deref()).unwrap_or("unknown"),
        client_version = client.and_then(|c| c.version.as_deref()).unwrap_or("unknown"),
        protocol = params.protocol_version.as_deref().unwrap_or("unspecified"),
        "client initializing"
    );
}

pub mod request;
pub mod response;

pub use request::{
    CheckLinkParams, ClientInfo, InitializeParams, JsonRpcRequest, RpcId, ToolCallParams,
};
pub use response::{JsonRpcError, JsonRpcResponse, ToolResult, ToolResultContent};

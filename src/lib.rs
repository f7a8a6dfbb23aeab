//! MCP server for checking link reachability.
//!
//! Exposes a single `check-link` tool over JSON-RPC 2.0 stdio transport,
//! compatible with any MCP-aware AI agent. The tool sends one HEAD request
//! per call and reports the link as `valid` or `invalid` in plain text.

pub mod checker;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod protocol;
pub mod server;

pub mod schema;

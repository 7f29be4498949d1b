//! RPC router — dispatches JSON-RPC method calls to tools
//!
//! Lifecycle methods (initialize, initialized, shutdown, exit) are handled
//! by the server itself. Everything else lands here: `ping`, MCP-style
//! `tools/list` and `tools/call`, and each tool invoked directly by name.

use memcore_core::{CallToolParams, Error, RequestId, RpcError, RpcResponse};
use memcore_tools::{parse_args, ToolRegistry};
use serde_json::{json, Value};
use tracing::debug;

/// Result type for RPC handlers.
pub type RpcResult = Result<Value, Error>;

/// Whether a method needs the memory to be loaded first.
pub fn requires_ready(method: &str, registry: &ToolRegistry) -> bool {
    method == "tools/call" || registry.contains(method)
}

/// Route an RPC method call to the appropriate handler.
pub async fn route_rpc(method: &str, params: Value, registry: &ToolRegistry) -> RpcResult {
    match method {
        "ping" => Ok(json!({})),
        "tools/list" => handle_tools_list(registry),
        "tools/call" => handle_tools_call(params, registry).await,
        name if registry.contains(name) => {
            debug!("direct tool call: {}", name);
            registry.execute(name, params).await
        }
        _ => Err(Error::MethodNotFound(method.to_string())),
    }
}

/// Convert an RPC result to an RpcResponse.
pub fn to_response(id: Option<RequestId>, result: RpcResult) -> RpcResponse {
    match result {
        Ok(value) => RpcResponse::ok(id, value),
        Err(e) => RpcResponse::err(id, RpcError::from(&e)),
    }
}

// ---------------------------------------------------------------------------
// tools/list — list available tools
// ---------------------------------------------------------------------------

fn handle_tools_list(registry: &ToolRegistry) -> RpcResult {
    Ok(json!({ "tools": registry.descriptors() }))
}

// ---------------------------------------------------------------------------
// tools/call — run a tool by name
// ---------------------------------------------------------------------------

/// Successes are wrapped as MCP content; failures stay JSON-RPC errors.
async fn handle_tools_call(params: Value, registry: &ToolRegistry) -> RpcResult {
    let call: CallToolParams = parse_args(params)?;
    debug!("tools/call: {}", call.name);
    let value = registry.execute(&call.name, call.arguments).await?;
    let text = match &value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other)?,
    };
    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": value,
        "isError": false,
    }))
}

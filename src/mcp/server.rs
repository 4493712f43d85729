//! MCP tool server
//!
//! Serves the tool registry over HTTP: each POST carries one JSON-RPC
//! message and receives the matching response. Tool input-validation
//! failures ride inside successful `tools/call` results as data; only
//! unknown tools and malformed parameters are flagged `isError`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::Result;
use crate::mcp::types::{
    methods, CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, RequestId, ServerCapabilities, ServerInfo, ToolsCapability,
    MCP_VERSION,
};
use crate::toolbox::ToolRegistry;

/// MCP server info
const SERVER_NAME: &str = "toolchat-tools";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server hosting the tool registry
pub struct McpToolServer {
    registry: Arc<ToolRegistry>,
}

impl McpToolServer {
    /// Create a new MCP server
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Build the router for the JSON-RPC endpoint
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", post(rpc_handler))
            .with_state(self.registry.clone())
    }

    /// Bind and serve until shutdown
    pub async fn run(self, addr: SocketAddr) -> Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("MCP tool server listening on {}", addr);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

async fn rpc_handler(
    State(registry): State<Arc<ToolRegistry>>,
    Json(message): Json<Value>,
) -> Response {
    let request: JsonRpcRequest = match serde_json::from_value(message) {
        Ok(request) => request,
        Err(e) => {
            return Json(JsonRpcResponse::error(
                RequestId::Number(0),
                JsonRpcError::parse_error(e.to_string()),
            ))
            .into_response();
        }
    };

    // Notifications carry no id and get no response body
    let id = match request.id.clone() {
        Some(id) => id,
        None => return StatusCode::ACCEPTED.into_response(),
    };

    let response = dispatch(&registry, &request, id).await;
    Json(response).into_response()
}

async fn dispatch(registry: &ToolRegistry, request: &JsonRpcRequest, id: RequestId) -> JsonRpcResponse {
    match request.method.as_str() {
        methods::INITIALIZE => JsonRpcResponse::success(id, initialize_result()),
        methods::PING => JsonRpcResponse::success(id, json!({})),
        methods::LIST_TOOLS => {
            let result = ListToolsResult {
                tools: registry.descriptors(),
            };
            match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
            }
        }
        methods::CALL_TOOL => {
            let result = handle_call_tool(registry, request.params.as_ref());
            JsonRpcResponse::success(id, result)
        }
        _ => JsonRpcResponse::error(id, JsonRpcError::method_not_found(&request.method)),
    }
}

fn initialize_result() -> Value {
    let result = InitializeResult {
        protocol_version: MCP_VERSION.to_string(),
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
        },
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
    };

    serde_json::to_value(result).unwrap_or_else(|_| json!({}))
}

fn handle_call_tool(registry: &ToolRegistry, params: Option<&Value>) -> Value {
    let params: CallToolParams = match params {
        Some(p) => match serde_json::from_value(p.clone()) {
            Ok(params) => params,
            Err(e) => {
                return tool_result_value(CallToolResult::error(format!(
                    "Invalid tool parameters: {}",
                    e
                )));
            }
        },
        None => return tool_result_value(CallToolResult::error("Missing tool parameters")),
    };

    tracing::debug!("Calling tool: {}", params.name);

    match registry.call(&params.name, params.arguments) {
        Some(result) => {
            let text = serde_json::to_string(&result).unwrap_or_default();
            tool_result_value(CallToolResult::text(text))
        }
        None => tool_result_value(CallToolResult::error(format!("Unknown tool: {}", params.name))),
    }
}

fn tool_result_value(result: CallToolResult) -> Value {
    serde_json::to_value(&result).unwrap_or_else(|e| {
        json!({
            "content": [{"type": "text", "text": format!("Error: {}", e)}],
            "isError": true,
        })
    })
}

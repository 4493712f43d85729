//! MCP client
//!
//! JSON-RPC client for the tool server, plus the connected tool set the
//! agent handler works against.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agent::ToolExecutor;
use crate::error::McpClientError;
use crate::llm::ToolDefinition;
use crate::mcp::types::{
    methods, CallToolResult, InitializeResult, JsonRpcRequest, JsonRpcResponse, ListToolsResult,
    ToolDescriptor, MCP_VERSION,
};

/// JSON-RPC client for an MCP tool server
pub struct McpClient {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl McpClient {
    /// Create a client for the given endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, McpClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) as i64;
        let request = JsonRpcRequest::new(id, method, params);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(McpClientError::UnexpectedResponse {
                message: format!("HTTP {}: {}", status, text),
            });
        }

        let rpc: JsonRpcResponse = response.json().await?;

        if let Some(error) = rpc.error {
            return Err(McpClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc.result.ok_or_else(|| McpClientError::UnexpectedResponse {
            message: "response carries neither result nor error".to_string(),
        })
    }

    async fn notify(&self, method: &str) -> Result<(), McpClientError> {
        let request = JsonRpcRequest::notification(method);
        self.http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Perform the MCP initialize handshake
    pub async fn initialize(&self) -> Result<InitializeResult, McpClientError> {
        let params = json!({
            "protocolVersion": MCP_VERSION,
            "clientInfo": {
                "name": "toolchat-gateway",
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {},
        });

        let value = self.request(methods::INITIALIZE, Some(params)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// List the server's tools
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpClientError> {
        let value = self.request(methods::LIST_TOOLS, None).await?;
        let result: ListToolsResult = serde_json::from_value(value)?;
        Ok(result.tools)
    }

    /// Call a tool by name
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, McpClientError> {
        let params = json!({ "name": name, "arguments": arguments });
        let value = self.request(methods::CALL_TOOL, Some(params)).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// A connected tool server with its tool list cached at startup
pub struct McpToolSet {
    client: McpClient,
    tools: Vec<ToolDescriptor>,
}

impl McpToolSet {
    /// Connect to a tool server: handshake, then cache the tool list
    pub async fn connect(url: &str) -> Result<Self, McpClientError> {
        let client = McpClient::new(url);

        let init = client
            .initialize()
            .await
            .map_err(|e| McpClientError::ConnectFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        client.notify(methods::INITIALIZED).await?;

        let tools = client.list_tools().await?;
        tracing::info!(
            "Connected to MCP server {} v{} ({} tools)",
            init.server_info.name,
            init.server_info.version,
            tools.len()
        );

        Ok(Self { client, tools })
    }

    /// Cached tool descriptors
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }
}

#[async_trait]
impl ToolExecutor for McpToolSet {
    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name.clone(),
                description: tool.description.clone().unwrap_or_default(),
                parameters: tool.input_schema.clone(),
            })
            .collect()
    }

    async fn execute(&self, name: &str, arguments: Value) -> Result<String, McpClientError> {
        let result = self.client.call_tool(name, arguments).await?;
        Ok(result.joined_text())
    }
}

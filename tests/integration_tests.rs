//! Integration tests for the toolchat service
//!
//! These tests verify the MCP protocol handling, the tool server, and the
//! gateway end to end. The LLM is scripted - no network calls leave the
//! process.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use toolchat::agent::{AgentHandler, ToolExecutor};
use toolchat::error::LlmError;
use toolchat::gateway::{router, AppState};
use toolchat::llm::{CompletionRequest, CompletionResponse, LlmProvider, ToolCall};
use toolchat::mcp::client::McpToolSet;
use toolchat::mcp::server::McpToolServer;
use toolchat::toolbox::ToolRegistry;

// ==================== Helpers ====================

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn read_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

fn tool_server_router() -> axum::Router {
    McpToolServer::new(Arc::new(ToolRegistry::with_builtin_tools())).router()
}

/// Spawn the tool server on an ephemeral loopback port
async fn spawn_tool_server() -> String {
    let app = tool_server_router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

/// Scripted LLM provider: pops one canned response per call
struct ScriptedLlm {
    responses: Mutex<Vec<CompletionResponse>>,
}

impl ScriptedLlm {
    fn new(mut responses: Vec<CompletionResponse>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| LlmError::InvalidResponse {
                reason: "script exhausted".to_string(),
            })
    }
}

fn text(content: &str) -> CompletionResponse {
    CompletionResponse {
        content: Some(content.to_string()),
        tool_calls: Vec::new(),
    }
}

fn tool_call(name: &str, arguments: Value) -> CompletionResponse {
    CompletionResponse {
        content: None,
        tool_calls: vec![ToolCall {
            id: "call_1".to_string(),
            name: name.to_string(),
            arguments,
        }],
    }
}

/// Gateway state wired to a live loopback tool server and a scripted LLM
async fn ready_state(responses: Vec<CompletionResponse>) -> AppState {
    let url = spawn_tool_server().await;
    let toolset = McpToolSet::connect(&url).await.expect("connect");
    let agent = AgentHandler::new(Arc::new(ScriptedLlm::new(responses)));
    AppState::new(
        Some(Arc::new(toolset) as Arc<dyn ToolExecutor>),
        Some(Arc::new(agent)),
    )
}

// ==================== MCP protocol ====================

mod mcp_protocol_tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_handshake() {
        let app = tool_server_router();
        let request = post_json(
            "/",
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "clientInfo": {"name": "test-client", "version": "1.0.0"},
                    "capabilities": {}
                }
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["id"], 1);
        assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
        assert!(body["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_initialized_notification_has_no_body() {
        let app = tool_server_router();
        let request = post_json(
            "/",
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_list_tools_enumerates_seven() {
        let app = tool_server_router();
        let request = post_json("/", json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}));

        let response = app.oneshot(request).await.unwrap();
        let body = read_json(response).await;

        let tools = body["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 7);
        for tool in tools {
            assert!(tool["name"].is_string());
            assert_eq!(tool["inputSchema"]["type"], "object");
        }
    }

    #[tokio::test]
    async fn test_call_tool_returns_result_object() {
        let app = tool_server_router();
        let request = post_json(
            "/",
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {
                    "name": "convert_temperature",
                    "arguments": {"temperature": 100, "from_unit": "C", "to_unit": "F"}
                }
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        let body = read_json(response).await;

        let text = body["result"]["content"][0]["text"].as_str().unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed["converted_temperature"], 212.0);
        assert_eq!(parsed["converted_unit"], "F");
    }

    #[tokio::test]
    async fn test_malformed_request_is_parse_error() {
        let app = tool_server_router();
        // Valid JSON, but not a JSON-RPC request
        let request = post_json("/", json!({"id": 1}));

        let response = app.oneshot(request).await.unwrap();
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_unknown_method_is_rpc_error() {
        let app = tool_server_router();
        let request = post_json("/", json!({"jsonrpc": "2.0", "id": 4, "method": "prompts/list"}));

        let response = app.oneshot(request).await.unwrap();
        let body = read_json(response).await;
        assert!(body["result"].is_null());
        assert_eq!(body["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let app = tool_server_router();
        let request = post_json(
            "/",
            json!({
                "jsonrpc": "2.0",
                "id": 5,
                "method": "tools/call",
                "params": {"name": "frobnicate", "arguments": {}}
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        let body = read_json(response).await;
        assert_eq!(body["result"]["isError"], true);
    }
}

// ==================== MCP client against a live server ====================

mod mcp_client_tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_caches_tool_list() {
        let url = spawn_tool_server().await;
        let toolset = McpToolSet::connect(&url).await.unwrap();

        assert_eq!(toolset.descriptors().len(), 7);
        assert!(toolset
            .descriptors()
            .iter()
            .any(|t| t.name == "calculate_tip"));
    }

    #[tokio::test]
    async fn test_execute_tool_over_http() {
        let url = spawn_tool_server().await;
        let toolset = McpToolSet::connect(&url).await.unwrap();

        let result = toolset
            .execute(
                "calculate_tip",
                json!({"bill_amount": 100.0, "tip_percentage": 20.0, "num_people": 2}),
            )
            .await
            .unwrap();

        let parsed: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["total_amount"], 120.0);
        assert_eq!(parsed["per_person"], 60.0);
    }

    #[tokio::test]
    async fn test_validation_error_rides_as_data() {
        let url = spawn_tool_server().await;
        let toolset = McpToolSet::connect(&url).await.unwrap();

        let result = toolset
            .execute("generate_password", json!({"length": 2}))
            .await
            .unwrap();

        let parsed: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(
            parsed["error"],
            "Password length must be at least 4 characters"
        );
    }

    #[tokio::test]
    async fn test_connect_fails_against_dead_endpoint() {
        let result = McpToolSet::connect("http://127.0.0.1:1").await;
        assert!(result.is_err());
    }
}

// ==================== Gateway ====================

mod gateway_tests {
    use super::*;

    fn uninitialized_state() -> AppState {
        AppState::new(None, None)
    }

    #[tokio::test]
    async fn test_root_reports_readiness_flags() {
        let app = router(uninitialized_state());
        let body = read_json(app.oneshot(get("/")).await.unwrap()).await;
        assert_eq!(body["status"], "running");
        assert_eq!(body["mcp_connected"], false);
        assert_eq!(body["agent_ready"], false);

        let app = router(ready_state(vec![]).await);
        let body = read_json(app.oneshot(get("/")).await.unwrap()).await;
        assert_eq!(body["mcp_connected"], true);
        assert_eq!(body["agent_ready"], true);
    }

    #[tokio::test]
    async fn test_health_components() {
        let app = router(ready_state(vec![]).await);
        let body = read_json(app.oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["components"]["mcp_client"], true);
        assert_eq!(body["components"]["agent_handler"], true);
        assert_eq!(body["components"]["tools"], true);
    }

    #[tokio::test]
    async fn test_gating_when_uninitialized() {
        let app = router(uninitialized_state());

        let response = app
            .clone()
            .oneshot(post_json("/chat", json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = read_json(response).await;
        assert!(body["detail"].as_str().unwrap().contains("not initialized"));

        let response = app.clone().oneshot(get("/tools")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app
            .oneshot(post_json("/tools/test/calculate_bmi", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_tools_endpoint_lists_metadata() {
        let app = router(ready_state(vec![]).await);
        let response = app.oneshot(get("/tools")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["count"], 7);
        let tools = body["tools"].as_array().unwrap();
        assert!(tools
            .iter()
            .any(|t| t["name"] == "get_weather" && t["parameters"]["type"] == "object"));
    }

    #[tokio::test]
    async fn test_chat_end_to_end_with_tool_call() {
        let state = ready_state(vec![
            tool_call(
                "calculate_bmi",
                json!({"weight": 70.0, "height": 1.75}),
            ),
            text("The BMI for someone weighing 70kg at 1.75m is 22.86, which is normal weight."),
        ])
        .await;
        let app = router(state);

        let response = app
            .oneshot(post_json(
                "/chat",
                json!({"message": "What is the BMI for someone weighing 70kg and 1.75m tall?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert!(!body["response"].as_str().unwrap().is_empty());
        assert!(body["response"].as_str().unwrap().contains("22.86"));
        assert_eq!(body["session_id"], "default");
        assert_eq!(body["tools_used"], json!(["calculate_bmi"]));
    }

    #[tokio::test]
    async fn test_chat_echoes_session_id() {
        let state = ready_state(vec![text("Hello!")]).await;
        let app = router(state);

        let response = app
            .oneshot(post_json(
                "/chat",
                json!({"message": "hi", "session_id": "abc-123"}),
            ))
            .await
            .unwrap();

        let body = read_json(response).await;
        assert_eq!(body["session_id"], "abc-123");
        assert_eq!(body["tools_used"], json!([]));
    }

    #[tokio::test]
    async fn test_chat_maps_agent_failure_to_500() {
        // Empty script: the provider errors on the first completion
        let state = ready_state(vec![]).await;
        let app = router(state);

        let response = app
            .oneshot(post_json("/chat", json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = read_json(response).await;
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("Error processing chat request"));
    }

    #[tokio::test]
    async fn test_chat_stream_emits_final_chunk() {
        let state = ready_state(vec![text("one two three")]).await;
        let app = router(state);

        let response = app
            .oneshot(post_json("/chat/stream", json!({"message": "count"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_text(response).await;
        let chunks: Vec<Value> = body
            .lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(|data| serde_json::from_str(data).unwrap())
            .collect();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0]["response"], "one ");
        assert_eq!(chunks[0]["is_final"], false);
        assert_eq!(chunks[2]["response"], "three ");
        assert_eq!(chunks[2]["is_final"], true);
    }

    #[tokio::test]
    async fn test_chat_stream_reports_errors_in_band() {
        let state = ready_state(vec![]).await;
        let app = router(state);

        let response = app
            .oneshot(post_json("/chat/stream", json!({"message": "hi"})))
            .await
            .unwrap();
        // Failures surface as an error event, not an HTTP error
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_text(response).await;
        let chunk: Value = body
            .lines()
            .find_map(|line| line.strip_prefix("data: "))
            .map(|data| serde_json::from_str(data).unwrap())
            .unwrap();
        assert!(chunk["error"].is_string());
        assert_eq!(chunk["is_final"], true);
    }

    #[tokio::test]
    async fn test_tool_test_endpoint_synthesizes_query() {
        let state = ready_state(vec![
            tool_call(
                "convert_temperature",
                json!({"temperature": 100, "from_unit": "C", "to_unit": "F"}),
            ),
            text("100 degrees Celsius is 212 degrees Fahrenheit."),
        ])
        .await;
        let app = router(state);

        let response = app
            .oneshot(post_json(
                "/tools/test/convert_temperature",
                json!({"temperature": 100, "from_unit": "C", "to_unit": "F"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["tool_name"], "convert_temperature");
        assert_eq!(body["parameters"]["temperature"], 100);
        assert!(body["response"].as_str().unwrap().contains("212"));
    }
}

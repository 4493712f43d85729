//! Gateway routes and application state
//!
//! All shared state lives in an application context constructed once at
//! startup and injected into handlers; there are no process globals.
//! Endpoints other than `/` and `/health` are gated on both the tool set
//! and the agent handler being initialized.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_http::cors::CorsLayer;

use crate::agent::{AgentHandler, ToolExecutor, ToolInfo};
use crate::config::Config;
use crate::error::Result;
use crate::mcp::client::McpToolSet;

/// Delay between pseudo-stream chunks
const STREAM_CHUNK_DELAY: Duration = Duration::from_millis(50);

fn default_session_id() -> String {
    "default".to_string()
}

/// Application context: initialized once at startup, read-only thereafter
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppContext>,
}

struct AppContext {
    toolset: Option<Arc<dyn ToolExecutor>>,
    agent: Option<Arc<AgentHandler>>,
}

impl AppState {
    /// Build the state from whatever components initialized successfully
    pub fn new(toolset: Option<Arc<dyn ToolExecutor>>, agent: Option<Arc<AgentHandler>>) -> Self {
        Self {
            inner: Arc::new(AppContext { toolset, agent }),
        }
    }

    fn components(&self) -> std::result::Result<(Arc<dyn ToolExecutor>, Arc<AgentHandler>), ApiError> {
        match (&self.inner.toolset, &self.inner.agent) {
            (Some(toolset), Some(agent)) => Ok((toolset.clone(), agent.clone())),
            _ => Err(ApiError::service_unavailable(
                "MCP client or agent handler not initialized",
            )),
        }
    }
}

/// Error payload: `{"detail": ...}`
#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: String,
}

struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn service_unavailable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorDetail {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default = "default_session_id")]
    session_id: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    session_id: String,
    tools_used: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
    status: &'static str,
    mcp_connected: bool,
    agent_ready: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    components: ComponentHealth,
}

#[derive(Debug, Serialize)]
struct ComponentHealth {
    mcp_client: bool,
    agent_handler: bool,
    tools: bool,
}

#[derive(Debug, Serialize)]
struct ToolsResponse {
    tools: Vec<ToolInfo>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct ToolTestResponse {
    tool_name: String,
    parameters: Option<Map<String, Value>>,
    response: String,
}

#[derive(Debug, Serialize)]
struct StreamChunk {
    response: String,
    session_id: String,
    is_final: bool,
}

#[derive(Debug, Serialize)]
struct StreamError {
    error: String,
    session_id: String,
    is_final: bool,
}

/// Build the gateway router around the given state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/chat", post(chat))
        .route("/chat/stream", post(chat_stream))
        .route("/tools/test/:tool_name", post(test_tool))
        .layer(cors)
        .with_state(state)
}

/// Initialize components and serve the gateway until shutdown
pub async fn run(config: &Config) -> Result<()> {
    let toolset: Option<Arc<dyn ToolExecutor>> =
        match McpToolSet::connect(&config.tool_server_url).await {
            Ok(set) => {
                tracing::info!("MCP client initialized with {} tools", set.descriptors().len());
                Some(Arc::new(set))
            }
            Err(e) => {
                tracing::warn!("Failed to initialize MCP client: {}", e);
                None
            }
        };

    let agent = match AgentHandler::from_config(&config.llm) {
        Ok(handler) => Some(Arc::new(handler)),
        Err(e) => {
            tracing::warn!("Failed to initialize agent handler: {}", e);
            None
        }
    };

    if toolset.is_none() || agent.is_none() {
        tracing::warn!("Some components failed to initialize, but server will continue");
    }

    let state = AppState::new(toolset, agent);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.gateway_addr).await?;
    tracing::info!("Gateway listening on {}", config.gateway_addr);
    tracing::info!("Endpoints: GET / | GET /health | GET /tools | POST /chat | POST /chat/stream | POST /tools/test/{{name}}");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "toolchat backend",
        status: "running",
        mcp_connected: state.inner.toolset.is_some(),
        agent_ready: state.inner.agent.is_some(),
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let tools_ready = state.inner.toolset.is_some();
    Json(HealthResponse {
        status: "healthy",
        components: ComponentHealth {
            mcp_client: tools_ready,
            agent_handler: state.inner.agent.is_some(),
            tools: tools_ready,
        },
    })
}

async fn list_tools(
    State(state): State<AppState>,
) -> std::result::Result<Json<ToolsResponse>, ApiError> {
    let (toolset, agent) = state.components()?;
    let tools = agent.get_available_tools_info(toolset.as_ref());
    Ok(Json(ToolsResponse {
        count: tools.len(),
        tools,
    }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    let (toolset, agent) = state.components()?;

    let reply = agent
        .process_query(&request.message, toolset.as_ref())
        .await
        .map_err(|e| ApiError::internal(format!("Error processing chat request: {}", e)))?;

    Ok(Json(ChatResponse {
        response: reply.text,
        session_id: request.session_id,
        tools_used: reply.tools_used,
    }))
}

/// Pseudo-streaming chat
///
/// The full response is computed first and then re-emitted word by word as
/// SSE data lines. This is a presentation simulation, not incremental
/// token generation.
async fn chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>, ApiError>
{
    let (toolset, agent) = state.components()?;

    let payloads: Vec<String> = match agent
        .process_query(&request.message, toolset.as_ref())
        .await
    {
        Ok(reply) => {
            let words: Vec<&str> = reply.text.split_whitespace().collect();
            let last = words.len().saturating_sub(1);
            words
                .iter()
                .enumerate()
                .map(|(i, word)| {
                    to_json_string(&StreamChunk {
                        response: format!("{} ", word),
                        session_id: request.session_id.clone(),
                        is_final: i == last,
                    })
                })
                .collect()
        }
        Err(e) => vec![to_json_string(&StreamError {
            error: e.to_string(),
            session_id: request.session_id.clone(),
            is_final: true,
        })],
    };

    let stream = stream::iter(payloads.into_iter().enumerate()).then(|(i, payload)| async move {
        if i > 0 {
            tokio::time::sleep(STREAM_CHUNK_DELAY).await;
        }
        Ok(Event::default().data(payload))
    });

    Ok(Sse::new(stream))
}

async fn test_tool(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
    parameters: Option<Json<Map<String, Value>>>,
) -> std::result::Result<Json<ToolTestResponse>, ApiError> {
    let (toolset, agent) = state.components()?;

    let parameters = parameters.map(|Json(p)| p);
    let query = build_test_query(&tool_name, parameters.as_ref());

    let reply = agent
        .process_query(&query, toolset.as_ref())
        .await
        .map_err(|e| ApiError::internal(format!("Error testing tool: {}", e)))?;

    Ok(Json(ToolTestResponse {
        tool_name,
        parameters,
        response: reply.text,
    }))
}

/// Build the synthetic natural-language query for `/tools/test/{name}`
fn build_test_query(tool_name: &str, parameters: Option<&Map<String, Value>>) -> String {
    match parameters {
        Some(params) if !params.is_empty() => {
            let param_str = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, display_value(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Use the {} tool with parameters: {}", tool_name, param_str)
        }
        _ => format!("Use the {} tool", tool_name),
    }
}

/// Render a JSON value the way it would read in a sentence
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

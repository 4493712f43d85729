//! Error types for the toolchat service
//!
//! This module defines the error hierarchy for all operations in the service.

use thiserror::Error;

/// Main error type for the toolchat service
#[derive(Error, Debug)]
pub enum ToolChatError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// MCP client errors
    #[error("MCP client error: {0}")]
    McpClient(#[from] McpClientError),

    /// Agent errors
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// LLM provider errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API key configured: set OPENAI_API_KEY")]
    MissingApiKey,

    #[error("LLM request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Invalid LLM response: {reason}")]
    InvalidResponse { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// MCP client errors
#[derive(Error, Debug)]
pub enum McpClientError {
    #[error("Failed to connect to tool server at {url}: {message}")]
    ConnectFailed { url: String, message: String },

    #[error("Tool server returned JSON-RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("Unexpected tool server response: {message}")]
    UnexpectedResponse { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Tool invocation error: {0}")]
    Tool(#[from] McpClientError),

    #[error("Agent exceeded {rounds} tool-calling rounds without a final answer")]
    ToolLoopExceeded { rounds: usize },
}

/// Result type alias for toolchat operations
pub type Result<T> = std::result::Result<T, ToolChatError>;

//! LLM integration
//!
//! A provider trait over chat completion with function calling, plus the
//! OpenAI implementation used in production. Tests inject scripted
//! providers through the same trait.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LlmError;

/// Message role in a chat transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One message in a chat transcript
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Option<String>,
    /// Set on tool-role messages: the call this message answers
    pub tool_call_id: Option<String>,
    /// Tool name on tool-role messages
    pub name: Option<String>,
    /// Set on assistant turns that requested tool calls
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_call_id: None,
            name: None,
            tool_calls: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_call_id: None,
            name: None,
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_call_id: None,
            name: None,
            tool_calls,
        }
    }

    pub fn tool(tool_call_id: &str, name: &str, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_call_id: Some(tool_call_id.to_string()),
            name: Some(name.to_string()),
            tool_calls: Vec::new(),
        }
    }
}

/// Tool definition advertised to the LLM for function calling
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's parameters
    pub parameters: Value,
}

/// A tool call requested by the LLM
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Chat completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
}

/// Chat completion response: plain text, tool calls, or both
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

/// Chat completion provider with function calling
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier, for logging
    fn model_name(&self) -> &str;

    /// Submit a transcript and tool definitions, get the next turn
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

//! Agent handler
//!
//! Binds the LLM, a static system prompt, and the MCP tool set into a
//! single-turn question-answering capability. Which tools to invoke (if
//! any) is the LLM's decision via function calling; this layer only wires
//! tools, prompt and query together and runs the call loop.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::LlmConfig;
use crate::error::{AgentError, LlmError, McpClientError};
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider, OpenAiClient, ToolDefinition};

/// Upper bound on function-calling rounds for a single query
const MAX_TOOL_ROUNDS: usize = 8;

const SYSTEM_PROMPT: &str = "\
You are a helpful AI assistant with access to various tools through the Model Context Protocol (MCP).

You can help users with:
- Health calculations (BMI)
- Weather information
- Financial calculations (compound interest, tip calculations)
- Utility functions (password generation, temperature conversion)
- Inspirational quotes

Always be helpful, accurate, and provide clear explanations for your responses.
When using tools, explain what you're doing and interpret the results in a user-friendly way.
If a tool returns an error, explain the issue and suggest how to fix it.

Be conversational and friendly while maintaining professionalism.";

/// Source of invocable tools for the agent
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Definitions to advertise to the LLM
    fn tool_definitions(&self) -> Vec<ToolDefinition>;

    /// Invoke a tool and return its textual result
    async fn execute(&self, name: &str, arguments: Value) -> Result<String, McpClientError>;
}

/// Final agent answer plus the tools invoked along the way
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    pub tools_used: Vec<String>,
}

/// Tool metadata for introspection endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Handler binding an LLM and a system prompt into an agent
pub struct AgentHandler {
    llm: Arc<dyn LlmProvider>,
    system_prompt: String,
}

impl AgentHandler {
    /// Create a handler around an LLM provider
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Construct from configuration; a missing API key is a construction error
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = OpenAiClient::new(config)?;
        tracing::info!("Agent handler using model {}", config.model);
        Ok(Self::new(Arc::new(client)))
    }

    /// Process a user query against the provided tools
    ///
    /// Builds a fresh transcript per call and runs the function-calling
    /// loop until the LLM answers in plain text. Returns the answer and
    /// the names of the tools that were invoked.
    pub async fn process_query(
        &self,
        query: &str,
        tools: &dyn ToolExecutor,
    ) -> Result<AgentReply, AgentError> {
        let definitions = tools.tool_definitions();
        let mut messages = vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(query),
        ];
        let mut tools_used: Vec<String> = Vec::new();

        for _ in 0..MAX_TOOL_ROUNDS {
            let response = self
                .llm
                .complete(CompletionRequest {
                    messages: messages.clone(),
                    tools: definitions.clone(),
                })
                .await?;

            if response.tool_calls.is_empty() {
                return Ok(AgentReply {
                    text: response.content.unwrap_or_default(),
                    tools_used,
                });
            }

            messages.push(ChatMessage::assistant(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            for call in response.tool_calls {
                tracing::debug!("Invoking tool {} with {}", call.name, call.arguments);
                let result = tools.execute(&call.name, call.arguments.clone()).await?;
                if !tools_used.contains(&call.name) {
                    tools_used.push(call.name.clone());
                }
                messages.push(ChatMessage::tool(&call.id, &call.name, result));
            }
        }

        Err(AgentError::ToolLoopExceeded {
            rounds: MAX_TOOL_ROUNDS,
        })
    }

    /// Tool metadata for display
    pub fn get_available_tools_info(&self, tools: &dyn ToolExecutor) -> Vec<ToolInfo> {
        tools
            .tool_definitions()
            .into_iter()
            .map(|d| ToolInfo {
                name: d.name,
                description: d.description,
                parameters: d.parameters,
            })
            .collect()
    }
}

//! Configuration management for the toolchat service
//!
//! All configuration comes from environment variables with sensible
//! local-development defaults.

use std::net::SocketAddr;

use crate::error::{ConfigError, Result, ToolChatError};

/// Default gateway bind address
const DEFAULT_GATEWAY_ADDR: &str = "127.0.0.1:8000";

/// Default tool server bind address
const DEFAULT_TOOL_SERVER_ADDR: &str = "127.0.0.1:8001";

/// Default tool server URL as seen from the gateway
const DEFAULT_TOOL_SERVER_URL: &str = "http://127.0.0.1:8001";

/// Configuration for the toolchat service
#[derive(Debug, Clone)]
pub struct Config {
    /// Gateway bind address
    pub gateway_addr: SocketAddr,

    /// Tool server bind address
    pub tool_server_addr: SocketAddr,

    /// URL the gateway's MCP client dials
    pub tool_server_url: String,

    /// LLM provider settings
    pub llm: LlmConfig,
}

/// LLM provider settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// OpenAI API key; absence is a construction error for the agent handler
    pub api_key: Option<String>,

    /// Chat model identifier
    pub model: String,

    /// API base URL (overridable for proxies)
    pub base_url: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion token cap
    pub max_tokens: u32,
}

impl Config {
    /// Load configuration from the environment
    pub fn new() -> Result<Self> {
        let gateway_addr = parse_addr("TOOLCHAT_GATEWAY_ADDR", DEFAULT_GATEWAY_ADDR)?;
        let tool_server_addr = parse_addr("TOOLCHAT_TOOL_SERVER_ADDR", DEFAULT_TOOL_SERVER_ADDR)?;

        let tool_server_url = std::env::var("TOOLCHAT_TOOL_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_TOOL_SERVER_URL.to_string());

        Ok(Self {
            gateway_addr,
            tool_server_addr,
            tool_server_url,
            llm: LlmConfig::from_env(),
        })
    }
}

impl LlmConfig {
    /// Read LLM settings from the environment
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4-turbo-preview".to_string()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            temperature: 0.1,
            max_tokens: 1000,
        }
    }
}

fn parse_addr(var: &str, default: &str) -> Result<SocketAddr> {
    let value = std::env::var(var).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|_| {
        ToolChatError::Config(ConfigError::InvalidValue {
            var: var.to_string(),
            value,
        })
    })
}

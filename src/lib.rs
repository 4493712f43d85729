//! toolchat
//!
//! A proof-of-concept chat backend for the Model Context Protocol (MCP):
//! an HTTP gateway forwards chat messages to an LLM-driven agent, which
//! may invoke tools hosted by a separate MCP tool server.

pub mod agent;
pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod mcp;
pub mod toolbox;

pub use config::Config;
pub use error::{Result, ToolChatError};

//! Agent handling: LLM-driven tool selection and answer synthesis

mod handler;

pub use handler::{AgentHandler, AgentReply, ToolExecutor, ToolInfo};

//! Tool registry
//!
//! An explicit mapping from tool name to implementation, populated once at
//! startup. The registry is immutable after construction; the MCP server
//! enumerates it for `tools/list` and dispatches `tools/call` through it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::mcp::types::ToolDescriptor;
use crate::toolbox::calculators::{BmiTool, CompoundInterestTool, TipTool};
use crate::toolbox::lookups::{QuoteTool, WeatherTool};
use crate::toolbox::utility::{PasswordTool, TemperatureTool};

/// A named, schema-described function the agent may invoke
pub trait Tool: Send + Sync {
    /// Unique tool name
    fn name(&self) -> &'static str;

    /// Human-readable description shown to the LLM
    fn description(&self) -> &'static str;

    /// JSON Schema for the tool's input object
    fn input_schema(&self) -> Value;

    /// Execute the tool. Returns either a success object echoing the
    /// validated inputs, or an object with a single `error` field.
    fn call(&self, args: Value) -> Value;
}

/// Registry of available tools
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Create a registry with all built-in tools registered
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BmiTool));
        registry.register(Arc::new(WeatherTool));
        registry.register(Arc::new(QuoteTool));
        registry.register(Arc::new(CompoundInterestTool));
        registry.register(Arc::new(PasswordTool));
        registry.register(Arc::new(TemperatureTool));
        registry.register(Arc::new(TipTool));
        tracing::info!("Registered {} built-in tools", registry.count());
        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        self.tools.insert(name, tool);
        tracing::debug!("Registered tool: {}", name);
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of registered tools
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Descriptors for every registered tool, in name order
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: Some(tool.description().to_string()),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Invoke a tool by name; `None` if no such tool is registered
    ///
    /// Absent arguments count as an empty object so tools with all-default
    /// parameters can be called bare.
    pub fn call(&self, name: &str, args: Value) -> Option<Value> {
        let args = if args.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            args
        };
        self.tools.get(name).map(|tool| tool.call(args))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_builtin_tools()
    }
}

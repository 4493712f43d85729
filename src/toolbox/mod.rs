//! Built-in tool implementations
//!
//! Each tool is a pure, schema-described function. Invalid input is
//! reported through an `error` field in the result object, never as a
//! transport-level failure; successful results echo the validated inputs
//! alongside the computed fields.

pub mod calculators;
pub mod lookups;
pub mod registry;
pub mod utility;

pub use registry::{Tool, ToolRegistry};

use serde_json::{json, Value};

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Error-shaped result: exactly one `error` field, nothing else
pub(crate) fn error_value(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

/// Error-shaped result for arguments that failed to deserialize
pub(crate) fn invalid_args(err: serde_json::Error) -> Value {
    error_value(format!("Invalid arguments: {}", err))
}

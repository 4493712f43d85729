//! Model Context Protocol support
//!
//! Protocol types plus the HTTP server and client used between the
//! gateway and the tool server.

pub mod client;
pub mod server;
pub mod types;

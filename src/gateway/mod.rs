//! HTTP gateway exposing the chat and tool endpoints

mod server;

pub use server::{router, run, AppState};

//! toolchat - MCP chat backend
//!
//! Runs either the HTTP gateway or the MCP tool server, selected by
//! subcommand. The two processes talk JSON-RPC over a local HTTP
//! endpoint.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use toolchat::config::Config;
use toolchat::gateway;
use toolchat::mcp::server::McpToolServer;
use toolchat::toolbox::ToolRegistry;

/// toolchat service
#[derive(Parser)]
#[command(name = "toolchat")]
#[command(author, version, about = "Chat backend and MCP multi-tool server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway (chat endpoints)
    Serve,
    /// Run the MCP tool server
    ToolServer,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::new()?;

    match cli.command {
        Commands::Serve => {
            tracing::info!("Starting toolchat gateway...");
            gateway::run(&config).await?;
        }
        Commands::ToolServer => {
            tracing::info!("Starting toolchat tool server...");
            let registry = Arc::new(ToolRegistry::with_builtin_tools());
            McpToolServer::new(registry).run(config.tool_server_addr).await?;
        }
    }

    Ok(())
}

// ABOUTME: CLI entry point for the odoolink MCP server binary
// ABOUTME: Loads Odoo settings, builds the tool registry, selects transport (stdio or HTTP), and serves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use odoolink::{BridgeError, OdooConfig};

use odoolink_mcp::dispatch::Dispatcher;
use odoolink_mcp::server::McpServer;
use odoolink_mcp::state::ServerState;
use odoolink_mcp::tools::build_tool_registry;
use odoolink_mcp::transport::{self, McpTransport};

/// Wire the server speaks on
#[derive(Clone, Copy, Debug, ValueEnum)]
enum TransportKind {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// Streamable HTTP on `--host:--port`
    Http,
}

/// odoolink-mcp: expose Odoo ERP operations as MCP tools
#[derive(Parser)]
#[command(name = "odoolink-mcp", version, about)]
struct Cli {
    #[arg(long, value_enum, default_value_t = TransportKind::Stdio)]
    transport: TransportKind,

    /// Bind port for the HTTP transport
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Bind address for the HTTP transport
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// TOML settings file; environment variables override its values
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

/// Resolve settings from the environment, optionally layered over a file
fn load_config(path: Option<&std::path::Path>) -> Result<OdooConfig, BridgeError> {
    #[cfg(feature = "config-file")]
    {
        let path = path
            .map(std::path::Path::to_path_buf)
            .or_else(|| odoolink::config::default_config_path().filter(|p| p.exists()));
        if let Some(path) = path {
            tracing::info!(path = %path.display(), "Loading settings file");
            return OdooConfig::from_file(&path);
        }
    }
    #[cfg(not(feature = "config-file"))]
    {
        if let Some(path) = path {
            return Err(BridgeError::config(format!(
                "--config {} needs the config-file feature",
                path.display()
            )));
        }
    }
    OdooConfig::from_env()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout belongs to the stdio transport
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let registry = build_tool_registry()?;
    tracing::info!(
        transport = ?cli.transport,
        url = %config.url,
        database = %config.database,
        tools = registry.len(),
        "Starting odoolink MCP server"
    );

    let state = Arc::new(ServerState::from_config(&config)?);
    let server = Arc::new(McpServer::new(Dispatcher::new(registry, state)));
    match cli.transport {
        TransportKind::Stdio => transport::stdio::StdioTransport.serve(server).await?,
        TransportKind::Http => {
            transport::http::HttpTransport::new(cli.host, cli.port)
                .serve(server)
                .await?;
        }
    }
    Ok(())
}

// ABOUTME: Transport abstraction for MCP server communication channels
// ABOUTME: Defines the McpTransport trait implemented by stdio and HTTP backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

pub mod http;
pub mod stdio;

use std::sync::Arc;

use async_trait::async_trait;
use odoolink::BridgeError;

use crate::server::McpServer;

/// A way of moving JSON-RPC messages between clients and an [`McpServer`]
///
/// Implementations own framing and concurrency; the server only ever sees
/// parsed requests. `serve` consumes the transport and returns when its
/// input ends (stdio EOF) or the listener stops (HTTP shutdown).
#[async_trait]
pub trait McpTransport: Send {
    /// Run until the transport's input is exhausted or shutdown is requested
    async fn serve(self, server: Arc<McpServer>) -> Result<(), BridgeError>;
}

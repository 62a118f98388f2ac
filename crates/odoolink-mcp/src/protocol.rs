// ABOUTME: MCP JSON-RPC protocol types for the Odoo tool server
// ABOUTME: Wire format for initialize, tools/list, tools/call results with structured content, and errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version every message must carry
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision spoken by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo` and on `/health`
pub const SERVER_NAME: &str = "odoolink-mcp";

/// Crate version, reported alongside the name
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// JSON-RPC Error Codes
// ============================================================================
// Only protocol-level failures use these. Tool failures travel inside a
// successful `tools/call` result with `isError: true`.

/// Body was not valid JSON, or not a JSON-RPC object
pub const PARSE_ERROR: i32 = -32_700;

/// Wrong `jsonrpc` marker
pub const INVALID_REQUEST: i32 = -32_600;

/// Method outside initialize, tools/list, tools/call, ping
pub const METHOD_NOT_FOUND: i32 = -32_601;

/// `tools/call` params missing or malformed
pub const INVALID_PARAMS: i32 = -32_602;

/// Response could not be serialized
pub const INTERNAL_ERROR: i32 = -32_603;

// ============================================================================
// JSON-RPC Messages
// ============================================================================

/// Inbound JSON-RPC message; a missing `id` marks a notification
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Notifications never get a response
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outbound JSON-RPC message carrying exactly one of `result` or `error`
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// Protocol-level error object
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    /// Successful reply to request `id`
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Protocol failure for request `id`
    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }
}

// ============================================================================
// MCP Initialize
// ============================================================================

/// Client handshake; only read for logging
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    pub client_info: ClientInfo,
}

/// Name and version the client announces
#[derive(Debug, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Server half of the handshake
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME,
                version: SERVER_VERSION,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Capabilities advertised at startup; only tools are offered
#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

/// The tool set is fixed for the life of the process
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

// ============================================================================
// MCP Tools
// ============================================================================

/// One entry of `tools/list`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Debug, Serialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDefinition>,
}

/// `tools/call` params; absent `arguments` is treated as `{}`
#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Content block of a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    /// Plain text; here always the serialized envelope or an error message
    Text { text: String },
}

impl ContentPart {
    /// Text carried by this part
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Result of `tools/call`
///
/// The dispatcher's envelope is sent twice: as JSON text for clients that
/// only read content parts, and verbatim under `structuredContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<ContentPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl CallToolResult {
    /// Failure that never produced an envelope
    pub fn error(message: String) -> Self {
        Self {
            content: vec![ContentPart::Text { text: message }],
            structured_content: None,
            is_error: true,
        }
    }

    /// Wrap a dispatcher envelope
    pub fn structured(envelope: Value, is_error: bool) -> Self {
        Self {
            content: vec![ContentPart::Text {
                text: envelope.to_string(),
            }],
            structured_content: Some(envelope),
            is_error,
        }
    }
}

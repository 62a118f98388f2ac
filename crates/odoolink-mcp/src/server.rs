// ABOUTME: MCP server core that routes JSON-RPC requests to protocol handlers and the tool dispatcher
// ABOUTME: Implements initialize, tools/list, tools/call, and ping MCP methods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::dispatch::{Dispatcher, ToolCallRequest};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ToolsListResult, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    JSONRPC_VERSION, METHOD_NOT_FOUND,
};

/// Transport-independent MCP endpoint
///
/// Transports parse requests, call [`McpServer::handle_request`] and write
/// back whatever it returns. The server is shared by reference, so
/// requests from one connection may be in flight at the same time.
pub struct McpServer {
    dispatcher: Dispatcher,
}

/// Serialize a method result, degrading to a JSON-RPC internal error
fn reply(id: Option<Value>, result: &impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {e}")),
    }
}

impl McpServer {
    /// Wrap a dispatcher holding the tool registry and shared state
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Registry and shared state behind `tools/*`
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Answer one JSON-RPC message; `None` for notifications
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                format!("Unsupported JSON-RPC version: {}", request.jsonrpc),
            ));
        }
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let JsonRpcRequest {
            id, method, params, ..
        } = request;
        let response = match method.as_str() {
            "initialize" => Self::initialize(id, params),
            "tools/list" => reply(
                id,
                &ToolsListResult {
                    tools: self.dispatcher.registry().list_definitions(),
                },
            ),
            "tools/call" => self.call_tool(id, params).await,
            "ping" => JsonRpcResponse::success(id, json!({})),
            other => {
                debug!(method = other, "Unknown MCP method");
                JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {other}"))
            }
        };
        Some(response)
    }

    fn initialize(id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        // A malformed handshake is still answered; the client info is only logged
        if let Some(init) = params.and_then(|p| serde_json::from_value::<InitializeParams>(p).ok())
        {
            debug!(
                client = %init.client_info.name,
                version = ?init.client_info.version,
                protocol = %init.protocol_version,
                capabilities = %init.capabilities,
                "MCP client connected"
            );
        }
        reply(id, &InitializeResult::default())
    }

    /// Run a tool and wrap the dispatcher envelope as a `tools/call` result
    ///
    /// The JSON-RPC id doubles as the envelope's `requestId`. Tool failures
    /// are successful JSON-RPC responses with `isError: true`; only bad
    /// params produce a JSON-RPC error.
    async fn call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                "Missing params for tools/call".to_owned(),
            );
        };
        let call: CallToolParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}"))
            }
        };

        let response = self
            .dispatcher
            .dispatch(ToolCallRequest {
                tool: call.name,
                arguments: call.arguments.unwrap_or_else(|| json!({})),
                request_id: id.clone().unwrap_or(Value::Null),
            })
            .await;

        let result = match serde_json::to_value(&response) {
            Ok(envelope) => CallToolResult::structured(envelope, response.is_error()),
            Err(e) => CallToolResult::error(format!("Result serialization error: {e}")),
        };
        reply(id, &result)
    }
}

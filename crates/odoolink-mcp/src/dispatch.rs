// ABOUTME: Request dispatcher resolving, validating, and executing tool calls
// ABOUTME: Normalizes every outcome into a result or error envelope keyed by the request id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! A call moves through `Received → Validated → Executing → Completed |
//! Failed`. Unknown tools and bad arguments fail before the handler runs;
//! handler failures keep their kind and diagnostic detail. Nothing is
//! retried here.
//!
//! The handler runs on its own task: if the caller goes away mid-request the
//! backend round-trip still completes instead of being cut off.

use std::time::Instant;

use odoolink::{BridgeError, ErrorKind};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::state::SharedState;
use crate::tools::ToolRegistry;

/// Inbound tool invocation
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    /// Tool wire name
    pub tool: String,
    /// Untyped argument mapping
    pub arguments: Value,
    /// Opaque correlation token echoed in the response
    pub request_id: Value,
}

/// Outcome of one tool call
#[derive(Debug, Clone)]
pub enum ToolCallResult {
    /// Handler payload
    Success(Value),
    /// Any failure, from lookup to backend
    Failure(BridgeError),
}

/// Error part of the outbound envelope
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    /// Stable machine-checkable kind
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Backend diagnostic detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Outbound envelope: `{requestId, result}` or `{requestId, error}`
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResponse {
    /// Correlation token from the request
    #[serde(rename = "requestId")]
    pub request_id: Value,
    /// Success payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
}

impl ToolCallResponse {
    /// Wrap an outcome for the given request
    pub fn new(request_id: Value, outcome: ToolCallResult) -> Self {
        match outcome {
            ToolCallResult::Success(payload) => Self {
                request_id,
                result: Some(payload),
                error: None,
            },
            ToolCallResult::Failure(err) => Self {
                request_id,
                result: None,
                error: Some(ErrorEnvelope {
                    kind: err.kind,
                    message: err.message,
                    detail: err.detail,
                }),
            },
        }
    }

    /// Whether this envelope reports a failure
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Error kind, when failed
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}

/// Routes tool calls through the registry to their handlers
pub struct Dispatcher {
    registry: ToolRegistry,
    state: SharedState,
}

impl Dispatcher {
    /// Create a dispatcher over a populated registry
    pub const fn new(registry: ToolRegistry, state: SharedState) -> Self {
        Self { registry, state }
    }

    /// Registered tools
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Shared state handed to handlers
    pub const fn state(&self) -> &SharedState {
        &self.state
    }

    /// Process one call to completion; never fails, never hangs on its own
    pub async fn dispatch(&self, request: ToolCallRequest) -> ToolCallResponse {
        let ToolCallRequest {
            tool,
            arguments,
            request_id,
        } = request;
        debug!(request_id = %request_id, tool = %tool, "Tool call received");

        let outcome = match self.run(&tool, arguments, &request_id).await {
            Ok(payload) => ToolCallResult::Success(payload),
            Err(err) => {
                if matches!(
                    err.kind,
                    ErrorKind::BackendFault | ErrorKind::BackendTimeout | ErrorKind::Internal
                ) {
                    warn!(request_id = %request_id, tool = %tool, kind = %err.kind, error = %err.message, "Tool call failed");
                } else {
                    debug!(request_id = %request_id, tool = %tool, kind = %err.kind, error = %err.message, "Tool call rejected");
                }
                ToolCallResult::Failure(err)
            }
        };

        ToolCallResponse::new(request_id, outcome)
    }

    async fn run(
        &self,
        tool: &str,
        arguments: Value,
        request_id: &Value,
    ) -> Result<Value, BridgeError> {
        let descriptor = self.registry.resolve(tool)?;
        let args = descriptor.schema().validate(tool, arguments)?;
        debug!(request_id = %request_id, tool, "Arguments validated");

        let handler = descriptor.handler();
        let state = SharedState::clone(&self.state);
        let started = Instant::now();
        let task = tokio::spawn(async move { handler.execute(&state, args).await });

        let outcome = task.await.map_err(|e| {
            BridgeError::internal(format!("Handler for '{tool}' did not complete: {e}"))
        })?;
        debug!(
            request_id = %request_id,
            tool,
            elapsed_ms = started.elapsed().as_millis(),
            ok = outcome.is_ok(),
            "Tool call executed"
        );
        outcome
    }
}

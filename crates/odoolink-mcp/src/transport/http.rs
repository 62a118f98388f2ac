// ABOUTME: HTTP transport implementing MCP Streamable HTTP with JSON and SSE responses
// ABOUTME: Serves POST /mcp (JSON or event stream by Accept) and GET /health behind optional bearer auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream;
use odoolink::BridgeError;
use tracing::{debug, info, warn};

use crate::auth;
use crate::health;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, PARSE_ERROR};
use crate::server::McpServer;
use crate::transport::McpTransport;

/// Streamable HTTP transport
///
/// One JSON-RPC message per POST. The reply is plain JSON, or a single SSE
/// `message` event when the client lists `text/event-stream` in `Accept`.
/// axum runs each request on its own task.
pub struct HttpTransport {
    addr: String,
}

impl HttpTransport {
    /// Transport that will listen on `host:port` once served
    pub fn new(host: String, port: u16) -> Self {
        Self {
            addr: format!("{host}:{port}"),
        }
    }
}

#[async_trait]
impl McpTransport for HttpTransport {
    async fn serve(self, server: Arc<McpServer>) -> Result<(), BridgeError> {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| BridgeError::internal(format!("Failed to bind {}: {e}", self.addr)))?;
        info!(address = %self.addr, "HTTP transport listening");

        axum::serve(listener, router(server))
            .with_graceful_shutdown(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutdown requested, finishing in-flight requests");
                }
            })
            .await
            .map_err(|e| BridgeError::internal(format!("HTTP server error: {e}")))
    }
}

/// Build the HTTP application
///
/// Routes:
/// - `POST /mcp`: JSON-RPC request, answered as JSON or a single SSE event
/// - `GET /health`: liveness without contacting the backend
///
/// The auth middleware covers every route and only enforces a key when
/// `ODOOLINK_API_KEY` is set.
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/mcp", post(mcp_post))
        .route("/health", get(health::handle))
        .layer(middleware::from_fn(auth::require_auth))
        .with_state(server)
}

/// Whether the client accepts an event-stream reply
fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|media| media.trim().starts_with("text/event-stream"))
}

async fn mcp_post(
    State(server): State<Arc<McpServer>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let response = match serde_json::from_str::<JsonRpcRequest>(&body) {
        Ok(request) => {
            debug!(method = %request.method, "HTTP MCP request");
            match server.handle_request(request).await {
                Some(response) => response,
                None => return StatusCode::ACCEPTED.into_response(),
            }
        }
        Err(e) => {
            warn!(error = %e, "Rejecting unparsable HTTP JSON-RPC body");
            JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"))
        }
    };

    if accepts_event_stream(&headers) {
        single_event(&response)
    } else {
        Json(response).into_response()
    }
}

/// One-event SSE stream carrying `response`
fn single_event(response: &JsonRpcResponse) -> Response {
    let event = Event::default()
        .event("message")
        .json_data(response)
        .unwrap_or_else(|e| {
            let fallback =
                JsonRpcResponse::error(None, INTERNAL_ERROR, format!("Serialization failed: {e}"));
            Event::default()
                .event("message")
                .data(serde_json::to_string(&fallback).unwrap_or_default())
        });
    Sse::new(stream::once(async { Ok::<_, Infallible>(event) })).into_response()
}

// ABOUTME: GET /health handler reporting server identity, tool count, and session state
// ABOUTME: Never contacts the backend, so it stays fast when Odoo is down
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::protocol::{SERVER_NAME, SERVER_VERSION};
use crate::server::McpServer;

/// Body of a health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests
    pub status: &'static str,
    /// Server name
    pub server: &'static str,
    /// Server version
    pub version: &'static str,
    /// Number of registered tools
    pub tools: usize,
    /// Whether a backend session is currently established
    pub has_session: bool,
}

/// Handle GET /health
pub async fn handle(State(server): State<Arc<McpServer>>) -> impl IntoResponse {
    let dispatcher = server.dispatcher();
    Json(HealthResponse {
        status: "ok",
        server: SERVER_NAME,
        version: SERVER_VERSION,
        tools: dispatcher.registry().len(),
        has_session: dispatcher.state().client().has_session().await,
    })
}

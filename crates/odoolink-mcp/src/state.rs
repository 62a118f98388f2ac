// ABOUTME: Shared server state holding the Odoo client and tool-level settings
// ABOUTME: Immutable after startup; the client owns the only mutable piece, the session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use odoolink::{BridgeError, OdooClient, OdooConfig};

/// Shared state handle passed to every tool handler
pub type SharedState = Arc<ServerState>;

/// Server state shared by all in-flight requests
///
/// Handlers never mutate it; concurrent requests only share the client's
/// session handle.
pub struct ServerState {
    client: Arc<OdooClient>,
    marketplace_field: String,
}

impl ServerState {
    /// Create state around an existing client
    pub fn new(client: Arc<OdooClient>, marketplace_field: impl Into<String>) -> Self {
        Self {
            client,
            marketplace_field: marketplace_field.into(),
        }
    }

    /// Build the HTTP JSON-RPC client described by `config`
    ///
    /// No backend contact happens here; the session opens on the first call.
    pub fn from_config(config: &OdooConfig) -> Result<Self, BridgeError> {
        let client = OdooClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config.marketplace_field.clone()))
    }

    /// Backend adapter
    pub fn client(&self) -> &OdooClient {
        &self.client
    }

    /// Sale-order field holding the marketplace label
    pub fn marketplace_field(&self) -> &str {
        &self.marketplace_field
    }
}

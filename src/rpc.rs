// ABOUTME: Remote-call channel abstraction and the Odoo JSON-RPC implementation over HTTP
// ABOUTME: Maps Odoo faults onto the bridge error taxonomy, detecting expired sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::OdooConfig;
use crate::types::BridgeError;

/// Odoo fault code used for session expiry
const SESSION_EXPIRED_CODE: i64 = 100;

/// An authenticated backend session
///
/// Held exclusively by [`OdooClient`](crate::client::OdooClient); handlers
/// never see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Authenticated user id
    pub uid: i64,
    /// When the login round-trip completed
    pub established_at: Instant,
}

impl Session {
    /// Create a session for the given user id
    pub fn new(uid: i64) -> Self {
        Self {
            uid,
            established_at: Instant::now(),
        }
    }
}

/// A single `model.method(*args, **kwargs)` invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    /// Target model, e.g. `res.partner`
    pub model: String,
    /// Model method, e.g. `search_read`
    pub method: String,
    /// Positional arguments
    pub args: Vec<Value>,
    /// Keyword arguments
    pub kwargs: Map<String, Value>,
}

impl RpcCall {
    /// Create a call with positional arguments and no keyword arguments
    pub fn new(model: impl Into<String>, method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            method: method.into(),
            args,
            kwargs: Map::new(),
        }
    }

    /// Set keyword arguments
    #[must_use]
    pub fn with_kwargs(mut self, kwargs: Map<String, Value>) -> Self {
        self.kwargs = kwargs;
        self
    }

    /// Whether the call changes persisted backend state
    pub fn is_mutation(&self) -> bool {
        matches!(self.method.as_str(), "create" | "write" | "unlink")
    }
}

/// Transport to the backend's remote-call endpoint
///
/// Implementations must be stateless per call once a [`Session`] exists so
/// that concurrent calls are independent round-trips.
#[async_trait]
pub trait RpcChannel: Send + Sync {
    /// Log in and return a fresh session
    async fn authenticate(&self) -> Result<Session, BridgeError>;

    /// Execute a model method within the given session
    ///
    /// Must report an invalidated session with `ErrorKind::SessionExpired`.
    async fn execute(&self, session: &Session, call: &RpcCall) -> Result<Value, BridgeError>;
}

// ============================================================================
// JSON-RPC over HTTP
// ============================================================================

/// JSON-RPC response envelope returned by `/jsonrpc`
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcFault>,
}

/// Fault object inside a JSON-RPC error response
#[derive(Debug, Deserialize)]
struct RpcFault {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<RpcFaultData>,
}

/// Server-side exception details attached to a fault
#[derive(Debug, Default, Deserialize)]
struct RpcFaultData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    debug: Option<String>,
}

/// Odoo's external API spoken as JSON-RPC over HTTP (`POST <url>/jsonrpc`)
///
/// Authentication uses the `common.authenticate` service; model calls go
/// through `object.execute_kw` carrying the uid and secret, so any number
/// of calls may be in flight on the shared `reqwest::Client`.
pub struct JsonRpcChannel {
    http: reqwest::Client,
    endpoint: String,
    database: String,
    login: String,
    secret: String,
    next_id: AtomicU64,
}

impl JsonRpcChannel {
    /// Create a channel from validated configuration
    pub fn new(config: &OdooConfig) -> Result<Self, BridgeError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BridgeError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!("{}/jsonrpc", config.url),
            database: config.database.clone(),
            login: config.login.clone(),
            secret: config.secret.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Post one JSON-RPC `call` and unwrap its result
    async fn post(&self, service: &str, method: &str, args: Value) -> Result<Value, BridgeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {"service": service, "method": method, "args": args},
            "id": id,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BridgeError::session_expired("Backend answered 401 Unauthorized"));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(
                BridgeError::backend_fault(format!("Backend HTTP error {status}")).with_detail(text),
            );
        }

        let envelope: RpcEnvelope = response.json().await.map_err(|e| {
            BridgeError::backend_fault(format!("Malformed JSON-RPC response: {e}"))
        })?;

        if let Some(fault) = envelope.error {
            return Err(classify_fault(fault));
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl RpcChannel for JsonRpcChannel {
    async fn authenticate(&self) -> Result<Session, BridgeError> {
        let result = self
            .post(
                "common",
                "authenticate",
                json!([self.database, self.login, self.secret, {}]),
            )
            .await?;

        // Odoo answers `false` for bad credentials instead of raising
        let uid = result.as_i64().ok_or_else(|| {
            BridgeError::backend_fault(format!(
                "Authentication rejected for login '{}' on database '{}'",
                self.login, self.database
            ))
        })?;

        debug!(uid, database = %self.database, "Authenticated against Odoo");
        Ok(Session::new(uid))
    }

    async fn execute(&self, session: &Session, call: &RpcCall) -> Result<Value, BridgeError> {
        self.post(
            "object",
            "execute_kw",
            json!([
                self.database,
                session.uid,
                self.secret,
                call.model,
                call.method,
                call.args,
                call.kwargs,
            ]),
        )
        .await
    }
}

/// Map a reqwest failure onto the error taxonomy
fn classify_transport_error(err: reqwest::Error) -> BridgeError {
    if err.is_timeout() {
        BridgeError::backend_timeout("Backend request timed out").with_detail(err.to_string())
    } else {
        BridgeError::backend_fault("Backend unreachable").with_detail(err.to_string())
    }
}

/// Map an Odoo JSON-RPC fault onto the error taxonomy
fn classify_fault(fault: RpcFault) -> BridgeError {
    let data = fault.data.unwrap_or_default();
    let expired = fault.code == SESSION_EXPIRED_CODE
        || data
            .name
            .as_deref()
            .is_some_and(|name| name.contains("SessionExpired"));

    let message = data
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or(fault.message);

    let err = if expired {
        BridgeError::session_expired(message)
    } else {
        BridgeError::backend_fault(message)
    };

    match (data.debug, data.name) {
        (Some(debug), _) if !debug.is_empty() => err.with_detail(debug),
        (_, Some(name)) => err.with_detail(name),
        _ => err,
    }
}

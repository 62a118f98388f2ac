// ABOUTME: Core types shared by the Odoo bridge: error taxonomy, records, and entity references
// ABOUTME: Provides BridgeError with stable kinds plus helpers for Odoo's loosely-typed values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Core Types
//!
//! Self-contained type definitions used across the adapter, the query
//! builders and the MCP server. Backend records stay as JSON maps; only the
//! identifier is lifted into a typed field.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for every bridge operation, from argument validation to RPC faults
#[derive(Debug, Clone)]
pub struct BridgeError {
    /// Error category, stable across releases
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Original backend detail kept for diagnostics only
    pub detail: Option<String>,
}

/// Categories of errors surfaced to tool callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed, missing, or ambiguous tool input (never reaches the backend)
    InvalidArgument,
    /// Unknown tool name
    ToolNotFound,
    /// Backend query returned nothing where one record was expected
    NotFound,
    /// Backend rejected the call
    BackendFault,
    /// Round-trip exceeded the configured bound
    BackendTimeout,
    /// Backend reported that the authenticated session is no longer valid
    SessionExpired,
    /// Configuration error (startup only)
    Config,
    /// Internal error (bug, unexpected state)
    Internal,
}

impl ErrorKind {
    /// Wire name used in error envelopes
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::ToolNotFound => "tool_not_found",
            Self::NotFound => "not_found",
            Self::BackendFault => "backend_fault",
            Self::BackendTimeout => "backend_timeout",
            Self::SessionExpired => "session_expired",
            Self::Config => "config",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BridgeError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create a tool-not-found error for the given tool name
    pub fn tool_not_found(name: &str) -> Self {
        Self::new(ErrorKind::ToolNotFound, format!("Unknown tool: {name}"))
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a backend fault error
    pub fn backend_fault(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendFault, message)
    }

    /// Create a backend timeout error
    pub fn backend_timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendTimeout, message)
    }

    /// Create a session-expired error
    pub fn session_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionExpired, message)
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Attach diagnostic detail (backend traceback, HTTP body, ...)
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Whether this error carries the given kind
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for BridgeError {}

// ============================================================================
// Records
// ============================================================================

/// A backend record as returned by `search_read`: field name to JSON value
pub type Record = Map<String, Value>;

/// Uniform reference to a remote record: typed id plus its display fields
///
/// Never cached; every tool call re-reads from the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRef {
    /// Backend record id
    pub id: i64,
    /// Remaining fields as returned by the backend
    #[serde(flatten)]
    pub fields: Record,
}

impl EntityRef {
    /// Lift a raw record into an entity reference
    ///
    /// Fails with `BackendFault` when the backend omitted the `id` field,
    /// which means the read contract was violated.
    pub fn from_record(mut record: Record) -> Result<Self, BridgeError> {
        let id = record
            .remove("id")
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or_else(|| BridgeError::backend_fault("Backend record is missing an integer id"))?;
        Ok(Self { id, fields: record })
    }

    /// Lift a batch of records, failing on the first malformed one
    pub fn from_records(records: Vec<Record>) -> Result<Vec<Self>, BridgeError> {
        records.into_iter().map(Self::from_record).collect()
    }

    /// Look up a display field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Display field as a string, treating Odoo's `false` as absent
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Decode an Odoo many2one value (`[id, "display name"]`, or `false` when unset)
pub fn many2one(value: &Value) -> Option<(i64, &str)> {
    let pair = value.as_array()?;
    let id = pair.first()?.as_i64()?;
    let name = pair.get(1).and_then(Value::as_str).unwrap_or_default();
    Some((id, name))
}

/// Read a numeric field that Odoo may send as integer or float
pub fn number(record: &Record, field: &str) -> f64 {
    record.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

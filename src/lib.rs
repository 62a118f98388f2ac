// ABOUTME: Odoo ERP bridge library: JSON-RPC adapter, typed domain filters, and per-entity queries
// ABOUTME: Re-exports the client, configuration, and error types used by the MCP server crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Odoolink
//!
//! Library half of the Odoo MCP bridge. It owns everything that talks to the
//! ERP backend; the protocol surface lives in the `odoolink-mcp` crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use odoolink::{OdooClient, OdooConfig};
//! use odoolink::query::partner::PartnerLookup;
//!
//! # async fn example() -> Result<(), odoolink::BridgeError> {
//! let config = OdooConfig::from_env()?;
//! let client = OdooClient::from_config(&config)?;
//! let query = PartnerLookup::resolve(None, Some("ana@example.com"), None)?.query()?;
//! let partners = client.search_read(&query).await?;
//! println!("{} match(es)", partners.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: Error taxonomy, records, and entity references
//! - [`config`]: Connection settings from the environment or a TOML file
//! - [`rpc`]: Wire-level channel to the backend's JSON-RPC endpoint
//! - [`client`]: Session-owning adapter with timeout and re-login handling
//! - [`domain`]: Validated domain filters and read queries
//! - [`query`]: Per-entity query builders and result shaping

/// Core types: errors, records, entity references
pub mod types;

/// Session-owning backend adapter
pub mod client;
/// Connection settings
pub mod config;
/// Typed domain filters
pub mod domain;
/// Per-entity query builders
pub mod query;
/// JSON-RPC channel and session handle
pub mod rpc;

pub use client::{OdooClient, Scan};
pub use config::OdooConfig;
pub use domain::{Domain, DomainBuilder, Model, Operator, ReadQuery};
pub use rpc::{JsonRpcChannel, RpcCall, RpcChannel, Session};
pub use types::{BridgeError, EntityRef, ErrorKind, Record};

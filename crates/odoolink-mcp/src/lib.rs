// ABOUTME: Library root re-exporting MCP server modules for the binary and integration tests
// ABOUTME: Enables tests/ to drive the dispatcher, registry, and HTTP router directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

pub mod auth;
pub mod dispatch;
pub mod health;
pub mod protocol;
pub mod schema;
pub mod server;
pub mod state;
pub mod tools;
pub mod transport;

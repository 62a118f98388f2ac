// ABOUTME: MCP tool listing a customer's unpaid invoices
// ABOUTME: Returns customer invoices whose payment state is anything but paid
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use odoolink::query::invoice::pending_for;
use odoolink::BridgeError;
use serde_json::Value;

use crate::schema::{InputSchema, ParamSpec, ParamType, ToolArgs};
use crate::state::SharedState;
use crate::tools::{listing, McpTool, ToolName};

/// Lists unpaid customer invoices of a partner
pub struct GetPendingInvoices;

#[async_trait]
impl McpTool for GetPendingInvoices {
    fn name(&self) -> ToolName {
        ToolName::GetPendingInvoices
    }

    fn description(&self) -> &'static str {
        "List a customer's invoices that are not yet paid, newest first"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "partner_id",
            ParamType::Integer,
            "Customer id",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let invoices = state
            .client()
            .search_read(&pending_for(args.int("partner_id")?)?)
            .await?;
        listing("pending_invoices", &invoices)
    }
}

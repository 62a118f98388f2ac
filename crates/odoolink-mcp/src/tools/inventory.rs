// ABOUTME: MCP tool reporting warehouse reorder rules for one product or the whole catalogue
// ABOUTME: Reads active orderpoints so assistants can answer stock-planning questions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use odoolink::query::inventory::orderpoints;
use odoolink::BridgeError;
use serde_json::Value;

use crate::schema::{InputSchema, ParamSpec, ParamType, ToolArgs};
use crate::state::SharedState;
use crate::tools::{listing, McpTool, ToolName};

/// Lists replenishment rules
pub struct GetReplenishmentInfo;

#[async_trait]
impl McpTool for GetReplenishmentInfo {
    fn name(&self) -> ToolName {
        ToolName::GetReplenishmentInfo
    }

    fn description(&self) -> &'static str {
        "Show reorder rules (min/max, forecast, quantity to order) for a product or all products"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::optional(
            "product_id",
            ParamType::Integer,
            "Product variant id; omit for every product",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let rules = state
            .client()
            .search_read(&orderpoints(args.opt_int("product_id"))?)
            .await?;
        listing("replenishment_info", &rules)
    }
}

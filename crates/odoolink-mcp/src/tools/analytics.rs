// ABOUTME: MCP tools ranking top customers and top-selling products over a date window
// ABOUTME: Pages through confirmed sales in the window and ranks them with deterministic tie-breaks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use chrono::Utc;
use odoolink::query::analytics::{
    confirmed_lines, confirmed_orders, rank_customers, rank_products, TopWindow, DEFAULT_TOP_LIMIT,
    MAX_SCANNED_LINES, MAX_SCANNED_ORDERS, SCAN_PAGE_SIZE,
};
use odoolink::{BridgeError, Scan};
use serde_json::Value;
use tracing::debug;

use crate::schema::{InputSchema, ParamSpec, ParamType, ToolArgs};
use crate::state::SharedState;
use crate::tools::{listing, McpTool, ToolName};

fn window_schema() -> InputSchema {
    InputSchema::new(vec![
        ParamSpec::optional(
            "date_from",
            ParamType::String,
            "First day, YYYY-MM-DD (default: 30 days before date_to)",
        ),
        ParamSpec::optional("date_to", ParamType::String, "Last day, YYYY-MM-DD (default: today)"),
        ParamSpec::optional("limit", ParamType::Integer, "Entries to return, 1 to 100")
            .with_default(DEFAULT_TOP_LIMIT),
    ])
}

fn resolve_window(args: &ToolArgs) -> Result<TopWindow, BridgeError> {
    TopWindow::resolve(
        args.opt_str("date_from"),
        args.opt_str("date_to"),
        args.opt_int("limit").unwrap_or(DEFAULT_TOP_LIMIT),
        Utc::now().date_naive(),
    )
}

/// Attach the resolved window, and whether the scan hit its ceiling, to a ranking payload
fn with_window(mut payload: Value, window: &TopWindow, scan: &Scan) -> Value {
    if let Value::Object(map) = &mut payload {
        map.insert("date_from".to_owned(), Value::from(window.range.from().to_string()));
        map.insert("date_to".to_owned(), Value::from(window.range.to().to_string()));
        map.insert("truncated".to_owned(), Value::from(scan.truncated));
    }
    payload
}

/// Ranks customers by confirmed sales amount
pub struct GetTopCustomers;

#[async_trait]
impl McpTool for GetTopCustomers {
    fn name(&self) -> ToolName {
        ToolName::GetTopCustomers
    }

    fn description(&self) -> &'static str {
        "Rank customers by confirmed sales amount in a date window (default: last 30 days, top 10)"
    }

    fn schema(&self) -> InputSchema {
        window_schema()
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let window = resolve_window(&args)?;
        let scan = state
            .client()
            .scan(&confirmed_orders(&window)?, SCAN_PAGE_SIZE, MAX_SCANNED_ORDERS)
            .await?;
        debug!(window = %window.range, scanned = scan.records.len(), "Ranking customers");
        let ranked = rank_customers(&scan.records, window.limit);
        Ok(with_window(listing("top_customers", &ranked)?, &window, &scan))
    }
}

/// Ranks products by confirmed quantity sold
pub struct GetTopSellingProducts;

#[async_trait]
impl McpTool for GetTopSellingProducts {
    fn name(&self) -> ToolName {
        ToolName::GetTopSellingProducts
    }

    fn description(&self) -> &'static str {
        "Rank products by quantity sold on confirmed orders in a date window (default: last 30 days, top 10)"
    }

    fn schema(&self) -> InputSchema {
        window_schema()
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let window = resolve_window(&args)?;
        let scan = state
            .client()
            .scan(&confirmed_lines(&window)?, SCAN_PAGE_SIZE, MAX_SCANNED_LINES)
            .await?;
        debug!(window = %window.range, scanned = scan.records.len(), "Ranking products");
        let ranked = rank_products(&scan.records, window.limit);
        Ok(with_window(listing("top_selling_products", &ranked)?, &window, &scan))
    }
}

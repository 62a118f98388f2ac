// ABOUTME: MCP tools for listing a customer's helpdesk tickets and opening new ones
// ABOUTME: Ticket creation returns only the new id; listings are newest first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use odoolink::query::helpdesk::{ticket_values, tickets_for};
use odoolink::{BridgeError, Model};
use serde_json::{json, Value};
use tracing::info;

use crate::schema::{InputSchema, ParamSpec, ParamType, ToolArgs};
use crate::state::SharedState;
use crate::tools::{listing, McpTool, ToolName};

/// Lists a partner's tickets
pub struct GetHelpdeskTickets;

#[async_trait]
impl McpTool for GetHelpdeskTickets {
    fn name(&self) -> ToolName {
        ToolName::GetHelpdeskTickets
    }

    fn description(&self) -> &'static str {
        "List a customer's helpdesk tickets, newest first"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "partner_id",
            ParamType::Integer,
            "Customer id",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let tickets = state
            .client()
            .search_read(&tickets_for(args.int("partner_id")?)?)
            .await?;
        listing("helpdesk_tickets", &tickets)
    }
}

/// Opens a ticket for a partner
pub struct CreateHelpdeskTicket;

#[async_trait]
impl McpTool for CreateHelpdeskTicket {
    fn name(&self) -> ToolName {
        ToolName::CreateHelpdeskTicket
    }

    fn description(&self) -> &'static str {
        "Open a helpdesk ticket for a customer"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ParamSpec::required("partner_id", ParamType::Integer, "Customer id"),
            ParamSpec::required("name", ParamType::String, "Ticket subject"),
            ParamSpec::optional("description", ParamType::String, "Details of the issue"),
        ])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let values = ticket_values(
            args.int("partner_id")?,
            args.str("name")?,
            args.opt_str("description"),
        )?;
        let id = state.client().create(Model::HelpdeskTicket, values).await?;
        info!(ticket_id = id, "Helpdesk ticket opened");
        Ok(json!({ "helpdesk_ticket": { "id": id } }))
    }
}

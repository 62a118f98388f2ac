// ABOUTME: MCP tools for creating partners and looking them up by id, email, or phone
// ABOUTME: Partner creation is idempotent on phone and reports ALREADY or CREATE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use odoolink::query::partner::{NewPartner, PartnerLookup, PartnerStatus};
use odoolink::{BridgeError, Model, Record};
use serde_json::{json, Value};
use tracing::debug;

use crate::schema::{InputSchema, ParamSpec, ParamType, ToolArgs};
use crate::state::SharedState;
use crate::tools::{first_or_not_found, McpTool, ToolName};

fn partner_payload(partner: Record, status: PartnerStatus) -> Value {
    json!({ "partner": partner, "status": status })
}

/// Creates a partner unless one with the same phone already exists
pub struct CreatePartner;

#[async_trait]
impl McpTool for CreatePartner {
    fn name(&self) -> ToolName {
        ToolName::CreatePartner
    }

    fn description(&self) -> &'static str {
        "Create a customer with name and phone; returns the existing one if the phone is already registered"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ParamSpec::required("name", ParamType::String, "Customer name"),
            ParamSpec::required("phone", ParamType::String, "Phone number, used to detect duplicates"),
            ParamSpec::optional("email", ParamType::String, "Email address"),
        ])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let partner = NewPartner::new(args.str("name")?, args.str("phone")?, args.opt_str("email"))?;
        let client = state.client();

        let existing = client.search_read(&partner.existing_lookup().query()?).await?;
        if let Some(found) = existing.into_iter().next() {
            debug!(lookup = %partner.existing_lookup(), "Partner already registered");
            return Ok(partner_payload(found, PartnerStatus::Already));
        }

        let id = client.create(Model::Partner, partner.values()).await?;
        let created = first_or_not_found(
            client.search_read(&PartnerLookup::Id(id).query()?).await?,
            || format!("Partner {id} was created but cannot be read back"),
        )?;
        Ok(partner_payload(created, PartnerStatus::Created))
    }
}

/// Reads one partner by id, email, or phone
pub struct GetPartner;

#[async_trait]
impl McpTool for GetPartner {
    fn name(&self) -> ToolName {
        ToolName::GetPartner
    }

    fn description(&self) -> &'static str {
        "Get a customer by id, email, or phone (id wins over email, email over phone)"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ParamSpec::optional("partner_id", ParamType::Integer, "Partner id"),
            ParamSpec::optional("email", ParamType::String, "Exact email address"),
            ParamSpec::optional("phone", ParamType::String, "Exact phone number"),
        ])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let lookup = PartnerLookup::resolve(
            args.opt_int("partner_id"),
            args.opt_str("email"),
            args.opt_str("phone"),
        )?;
        let records = state.client().search_read(&lookup.query()?).await?;
        let partner = first_or_not_found(records, || format!("No partner with {lookup}"))?;
        Ok(json!({ "partner": partner }))
    }
}

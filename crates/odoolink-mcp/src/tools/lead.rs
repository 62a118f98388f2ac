// ABOUTME: MCP tool opening a CRM opportunity for an existing partner
// ABOUTME: Reads the partner first so the lead carries its name and phone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use odoolink::query::lead::{opportunity_values, DEFAULT_LEAD_SOURCE};
use odoolink::query::non_blank;
use odoolink::query::partner::PartnerLookup;
use odoolink::{BridgeError, EntityRef, Model};
use serde_json::{json, Value};

use crate::schema::{InputSchema, ParamSpec, ParamType, ToolArgs};
use crate::state::SharedState;
use crate::tools::{first_or_not_found, McpTool, ToolName};

/// Creates an opportunity linked to a partner
pub struct CreateLead;

#[async_trait]
impl McpTool for CreateLead {
    fn name(&self) -> ToolName {
        ToolName::CreateLead
    }

    fn description(&self) -> &'static str {
        "Create a sales opportunity for an existing customer with a summary of the conversation"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ParamSpec::required("partner_id", ParamType::Integer, "Customer id"),
            ParamSpec::required("resume", ParamType::String, "Summary of the customer's request"),
            ParamSpec::required("email", ParamType::String, "Contact email for the lead"),
            ParamSpec::optional("source", ParamType::String, "Channel the lead came from")
                .with_default(DEFAULT_LEAD_SOURCE),
        ])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let lookup = PartnerLookup::resolve(Some(args.int("partner_id")?), None, None)?;
        let resume = non_blank("resume", args.str("resume")?)?;
        let email = non_blank("email", args.str("email")?)?;
        let client = state.client();

        let partner = first_or_not_found(client.search_read(&lookup.query()?).await?, || {
            format!("No partner with {lookup}")
        })?;
        let partner = EntityRef::from_record(partner)?;

        let values = opportunity_values(
            &partner,
            resume,
            email,
            args.opt_str("source").unwrap_or(DEFAULT_LEAD_SOURCE),
        )?;
        let id = client.create(Model::Lead, values).await?;
        Ok(json!({ "lead": { "id": id } }))
    }
}

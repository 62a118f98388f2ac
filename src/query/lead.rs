// ABOUTME: Value maps for CRM opportunities opened on behalf of an existing partner
// ABOUTME: Names the lead after its source channel and the partner's display name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde_json::Value;

use crate::query::non_blank;
use crate::types::{BridgeError, EntityRef, Record};

/// Channel label used when the caller does not name one
pub const DEFAULT_LEAD_SOURCE: &str = "WhatsApp";

/// Pipeline stage new opportunities start in
const INITIAL_STAGE_ID: i64 = 1;

/// Values for `crm.lead.create`
pub fn opportunity_values(
    partner: &EntityRef,
    resume: &str,
    email: &str,
    source: &str,
) -> Result<Record, BridgeError> {
    let resume = non_blank("resume", resume)?;
    let email = non_blank("email", email)?;
    let source = source.trim();
    let source = if source.is_empty() {
        DEFAULT_LEAD_SOURCE
    } else {
        source
    };
    let partner_name = partner.str_field("name").unwrap_or("Unknown partner");

    let mut values = Record::new();
    values.insert("type".to_owned(), Value::from("opportunity"));
    values.insert("stage_id".to_owned(), Value::from(INITIAL_STAGE_ID));
    values.insert(
        "name".to_owned(),
        Value::from(format!("{source} - {partner_name}")),
    );
    values.insert("email_from".to_owned(), Value::from(email));
    values.insert(
        "phone".to_owned(),
        partner.field("phone").cloned().unwrap_or(Value::Bool(false)),
    );
    values.insert("description".to_owned(), Value::from(resume));
    values.insert("partner_id".to_owned(), Value::from(partner.id));
    Ok(values)
}

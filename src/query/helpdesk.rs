// ABOUTME: Helpdesk ticket reads per partner and value maps for opening new tickets
// ABOUTME: Lists tickets newest first; the description is only sent when provided
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde_json::Value;

use crate::domain::{DomainBuilder, Model, ReadQuery};
use crate::query::{non_blank, positive_id};
use crate::types::{BridgeError, Record};

/// Fields returned for a ticket
pub const TICKET_FIELDS: &[&str] = &[
    "id",
    "name",
    "create_date",
    "stage_id",
    "user_id",
    "partner_id",
    "description",
];

/// Tickets opened by a partner, newest first
pub fn tickets_for(partner_id: i64) -> Result<ReadQuery, BridgeError> {
    let partner_id = positive_id("partner_id", partner_id)?;
    let domain = DomainBuilder::new(Model::HelpdeskTicket)
        .eq("partner_id", partner_id)
        .build()?;
    Ok(ReadQuery::new(domain, TICKET_FIELDS).order_by("create_date desc, id desc"))
}

/// Values for `helpdesk.ticket.create`
pub fn ticket_values(
    partner_id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<Record, BridgeError> {
    let partner_id = positive_id("partner_id", partner_id)?;
    let mut values = Record::new();
    values.insert("name".to_owned(), Value::from(non_blank("name", name)?));
    values.insert("partner_id".to_owned(), Value::from(partner_id));
    if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
        values.insert("description".to_owned(), Value::from(description));
    }
    Ok(values)
}

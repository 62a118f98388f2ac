// ABOUTME: Customer-invoice reads for a partner's outstanding balance
// ABOUTME: Selects posted customer invoices whose payment state is anything but paid
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use crate::domain::{DomainBuilder, Model, Operator, ReadQuery};
use crate::query::positive_id;
use crate::types::BridgeError;

/// Fields returned for an invoice
pub const INVOICE_FIELDS: &[&str] = &[
    "id",
    "name",
    "invoice_date",
    "invoice_date_due",
    "amount_total",
    "amount_residual",
    "payment_state",
    "partner_id",
];

/// Unpaid customer invoices of a partner, most recent first
pub fn pending_for(partner_id: i64) -> Result<ReadQuery, BridgeError> {
    let partner_id = positive_id("partner_id", partner_id)?;
    let domain = DomainBuilder::new(Model::Invoice)
        .eq("partner_id", partner_id)
        .eq("move_type", "out_invoice")
        .clause("payment_state", Operator::Ne, "paid")
        .build()?;
    Ok(ReadQuery::new(domain, INVOICE_FIELDS).order_by("invoice_date desc, id desc"))
}

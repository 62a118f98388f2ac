// ABOUTME: Sale-order reads by id, partner, name, marketplace, or date window, plus order creation values
// ABOUTME: Adds customer portal links to returned orders and prices single-product order lines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde_json::Value;

use crate::domain::{DomainBuilder, Model, Operator, ReadQuery};
use crate::query::{non_blank, positive_id, DateRange};
use crate::types::{number, BridgeError, EntityRef, Record};

/// Fields returned for a sale order
pub const SALE_ORDER_FIELDS: &[&str] = &[
    "id",
    "name",
    "partner_id",
    "date_order",
    "order_line",
    "state",
    "amount_total",
    "user_id",
    "company_id",
    "access_token",
    "access_url",
    "client_order_ref",
    "origin",
];

/// Compact projection used for date-window listings
pub const ORDER_SUMMARY_FIELDS: &[&str] =
    &["id", "name", "partner_id", "date_order", "amount_total", "state"];

/// At most one order with the given id
pub fn by_id(order_id: i64) -> Result<ReadQuery, BridgeError> {
    let order_id = positive_id("order_id", order_id)?;
    let domain = DomainBuilder::new(Model::SaleOrder).eq("id", order_id).build()?;
    Ok(ReadQuery::new(domain, SALE_ORDER_FIELDS).limit(1))
}

/// Every order placed by a partner, newest first
pub fn by_partner(partner_id: i64) -> Result<ReadQuery, BridgeError> {
    let partner_id = positive_id("partner_id", partner_id)?;
    let domain = DomainBuilder::new(Model::SaleOrder)
        .eq("partner_id", partner_id)
        .build()?;
    Ok(ReadQuery::new(domain, SALE_ORDER_FIELDS).order_by("date_order desc, id desc"))
}

/// Orders whose number, customer reference, or source document contains `name`
pub fn by_name(name: &str) -> Result<ReadQuery, BridgeError> {
    let name = non_blank("name", name)?;
    let domain = DomainBuilder::new(Model::SaleOrder)
        .any_of(|b| {
            b.ilike("name", name)
                .ilike("client_order_ref", name)
                .ilike("origin", name)
        })
        .build()?;
    Ok(ReadQuery::new(domain, SALE_ORDER_FIELDS).order_by("date_order desc, id desc"))
}

/// Orders whose marketplace label (held in `field`) contains `marketplace`
pub fn by_marketplace(field: &str, marketplace: &str) -> Result<ReadQuery, BridgeError> {
    let marketplace = non_blank("marketplace", marketplace)?;
    let domain = DomainBuilder::new(Model::SaleOrder)
        .ilike(field, marketplace)
        .build()?;
    Ok(ReadQuery::new(domain, SALE_ORDER_FIELDS).order_by("date_order desc, id desc"))
}

/// Orders dated inside the inclusive window, newest first
pub fn by_date(range: &DateRange) -> Result<ReadQuery, BridgeError> {
    let domain = DomainBuilder::new(Model::SaleOrder)
        .clause("date_order", Operator::Ge, range.start_bound())
        .clause("date_order", Operator::Le, range.end_bound())
        .build()?;
    Ok(ReadQuery::new(domain, ORDER_SUMMARY_FIELDS).order_by("date_order desc, id desc"))
}

/// Add the customer-portal `link` field to an order record
///
/// `access_url` is relative to the backend's base URL; the access token,
/// when present, is appended so the link works without logging in.
pub fn attach_portal_link(order: &mut Record, base_url: &str) {
    let Some(path) = order.get("access_url").and_then(Value::as_str) else {
        return;
    };
    let mut link = format!("{}{path}", base_url.trim_end_matches('/'));
    if let Some(token) = order
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
    {
        link.push_str("?access_token=");
        link.push_str(token);
    }
    order.insert("link".to_owned(), Value::from(link));
}

/// Validate a requested line quantity; any positive count is accepted
pub fn line_quantity(quantity: i64) -> Result<i64, BridgeError> {
    if quantity >= 1 {
        Ok(quantity)
    } else {
        Err(BridgeError::invalid_argument(format!(
            "'quantity' must be at least 1, got {quantity}"
        )))
    }
}

/// Values for the `sale.order.create` header (no lines yet)
pub fn header_values(partner_id: i64, access_token: &str) -> Result<Record, BridgeError> {
    let partner_id = positive_id("partner_id", partner_id)?;
    let mut values = Record::new();
    values.insert("partner_id".to_owned(), Value::from(partner_id));
    values.insert("access_token".to_owned(), Value::from(access_token));
    Ok(values)
}

/// Values for a `sale.order.line.create` attaching `product` to `order_id`
///
/// The unit price is the product's list price; the backend computes totals.
pub fn line_values(order_id: i64, product: &EntityRef, quantity: i64) -> Record {
    let mut values = Record::new();
    values.insert("order_id".to_owned(), Value::from(order_id));
    values.insert("product_id".to_owned(), Value::from(product.id));
    values.insert("product_uom_qty".to_owned(), Value::from(quantity));
    values.insert(
        "price_unit".to_owned(),
        Value::from(number(&product.fields, "list_price")),
    );
    values
}

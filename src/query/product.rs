// ABOUTME: Product reads across templates and variants by id, SKU, name, category, or catalogue
// ABOUTME: Merges template/variant results and removes duplicates by internal reference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::collections::HashSet;

use serde_json::Value;

use crate::domain::{DomainBuilder, Model, Operator, ReadQuery};
use crate::query::{non_blank, positive_id};
use crate::types::{BridgeError, Record};

/// Fields returned for a single product
pub const PRODUCT_FIELDS: &[&str] = &[
    "id",
    "name",
    "default_code",
    "barcode",
    "categ_id",
    "qty_available",
    "list_price",
    "currency_id",
    "description_sale",
    "invoice_policy",
    "taxes_id",
    "active",
    "type",
];

/// Compact projection used for catalogue listings
pub const CATALOGUE_FIELDS: &[&str] = &[
    "id",
    "name",
    "default_code",
    "barcode",
    "qty_available",
    "list_price",
];

/// Maximum products returned for a category subtree
const CATEGORY_PRODUCT_LIMIT: u32 = 100;

/// Models searched for single-product lookups, templates first
pub const LOOKUP_MODELS: [Model; 2] = [Model::ProductTemplate, Model::ProductVariant];

/// Identifier for a single-product lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductLookup {
    /// Record id
    Id(i64),
    /// Internal reference (`default_code`)
    Sku(String),
}

impl ProductLookup {
    /// Lookup by id
    pub fn id(product_id: i64) -> Result<Self, BridgeError> {
        positive_id("product_id", product_id).map(Self::Id)
    }

    /// Lookup by internal reference
    pub fn sku(sku: &str) -> Result<Self, BridgeError> {
        non_blank("sku", sku).map(|s| Self::Sku(s.to_owned()))
    }

    /// At most one match on `model`
    pub fn query(&self, model: Model) -> Result<ReadQuery, BridgeError> {
        let builder = DomainBuilder::new(model);
        let builder = match self {
            Self::Id(id) => builder.eq("id", *id),
            Self::Sku(sku) => builder.eq("default_code", sku.as_str()),
        };
        Ok(ReadQuery::new(builder.build()?, PRODUCT_FIELDS).limit(1))
    }
}

/// Active, in-stock, priced products on `model`, ordered by id
pub fn catalogue(model: Model) -> Result<ReadQuery, BridgeError> {
    let domain = DomainBuilder::new(model)
        .eq("active", true)
        .clause("qty_available", Operator::Gt, 0)
        .clause("list_price", Operator::Gt, 0)
        .build()?;
    Ok(ReadQuery::new(domain, CATALOGUE_FIELDS).order_by("id"))
}

/// Active products on `model` whose name matches every word of `name` in order
pub fn by_name(model: Model, name: &str) -> Result<ReadQuery, BridgeError> {
    let name = non_blank("name", name)?;
    let pattern = name.split_whitespace().collect::<Vec<_>>().join("%");
    let domain = DomainBuilder::new(model)
        .ilike("name", pattern)
        .eq("active", true)
        .build()?;
    Ok(ReadQuery::new(domain, PRODUCT_FIELDS).order_by("id"))
}

/// Active variants in the category or any of its descendants
pub fn in_category_tree(category_id: i64) -> Result<ReadQuery, BridgeError> {
    let category_id = positive_id("category_id", category_id)?;
    let domain = DomainBuilder::new(Model::ProductVariant)
        .clause("categ_id", Operator::ChildOf, category_id)
        .eq("active", true)
        .build()?;
    Ok(ReadQuery::new(domain, PRODUCT_FIELDS)
        .order_by("id")
        .limit(CATEGORY_PRODUCT_LIMIT))
}

/// Internal reference of a record, treating Odoo's `false` and blanks as absent
fn reference(record: &Record) -> Option<&str> {
    record
        .get("default_code")
        .and_then(Value::as_str)
        .filter(|code| !code.is_empty())
}

/// Keep the first record per internal reference; records without one are all kept
pub fn dedupe_by_reference(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| reference(record).is_none_or(|code| seen.insert(code.to_owned())))
        .collect()
}

/// Drop records carrying neither a barcode nor an internal reference
pub fn identifiable(records: Vec<Record>) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| {
            let has_barcode = record
                .get("barcode")
                .and_then(Value::as_str)
                .is_some_and(|b| !b.is_empty());
            has_barcode || reference(record).is_some()
        })
        .collect()
}

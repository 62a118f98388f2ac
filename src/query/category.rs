// ABOUTME: Product-category reads including immediate children and single-parent lookups
// ABOUTME: Children filter on the direct parent relation only, never on transitive descendants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use crate::domain::{DomainBuilder, Model, ReadQuery};
use crate::query::{non_blank, positive_id};
use crate::types::BridgeError;

/// Fields returned for a category
pub const CATEGORY_FIELDS: &[&str] = &[
    "id",
    "name",
    "complete_name",
    "parent_id",
    "child_id",
    "product_count",
];

/// Every category, ordered by id
pub fn all() -> Result<ReadQuery, BridgeError> {
    let domain = DomainBuilder::new(Model::ProductCategory).build()?;
    Ok(ReadQuery::new(domain, CATEGORY_FIELDS).order_by("id"))
}

/// At most one category with the given id
pub fn by_id(category_id: i64) -> Result<ReadQuery, BridgeError> {
    let category_id = positive_id("category_id", category_id)?;
    let domain = DomainBuilder::new(Model::ProductCategory)
        .eq("id", category_id)
        .build()?;
    Ok(ReadQuery::new(domain, CATEGORY_FIELDS).limit(1))
}

/// Categories whose name contains `name`, case-insensitively (zero or more)
pub fn by_name(name: &str) -> Result<ReadQuery, BridgeError> {
    let name = non_blank("name", name)?;
    let domain = DomainBuilder::new(Model::ProductCategory)
        .ilike("name", name)
        .build()?;
    Ok(ReadQuery::new(domain, CATEGORY_FIELDS).order_by("id"))
}

/// Direct children of `parent_id`
pub fn children_of(parent_id: i64) -> Result<ReadQuery, BridgeError> {
    let parent_id = positive_id("parent_id", parent_id)?;
    let domain = DomainBuilder::new(Model::ProductCategory)
        .eq("parent_id", parent_id)
        .build()?;
    Ok(ReadQuery::new(domain, CATEGORY_FIELDS).order_by("id"))
}

/// The category listing `child_id` among its direct children (at most one)
pub fn parent_of(child_id: i64) -> Result<ReadQuery, BridgeError> {
    let child_id = positive_id("child_id", child_id)?;
    let domain = DomainBuilder::new(Model::ProductCategory)
        .eq("child_id", child_id)
        .build()?;
    Ok(ReadQuery::new(domain, CATEGORY_FIELDS).limit(1))
}

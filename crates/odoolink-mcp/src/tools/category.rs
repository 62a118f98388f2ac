// ABOUTME: MCP tools for product categories: listing, id and name lookups, and hierarchy navigation
// ABOUTME: Children are direct descendants only; the parent lookup yields at most one record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use odoolink::query::category::{all, by_id, by_name, children_of, parent_of};
use odoolink::BridgeError;
use serde_json::{json, Value};

use crate::schema::{InputSchema, ParamSpec, ParamType, ToolArgs};
use crate::state::SharedState;
use crate::tools::{first_or_not_found, listing, McpTool, ToolName};

/// Lists every category
pub struct GetAllCategories;

#[async_trait]
impl McpTool for GetAllCategories {
    fn name(&self) -> ToolName {
        ToolName::GetAllCategories
    }

    fn description(&self) -> &'static str {
        "List all product categories"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::empty()
    }

    async fn execute(&self, state: &SharedState, _args: ToolArgs) -> Result<Value, BridgeError> {
        let categories = state.client().search_read(&all()?).await?;
        listing("categories", &categories)
    }
}

/// Reads one category by id
pub struct GetCategoryById;

#[async_trait]
impl McpTool for GetCategoryById {
    fn name(&self) -> ToolName {
        ToolName::GetCategoryById
    }

    fn description(&self) -> &'static str {
        "Get a product category by id"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "category_id",
            ParamType::Integer,
            "Category id",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let category_id = args.int("category_id")?;
        let records = state.client().search_read(&by_id(category_id)?).await?;
        let category = first_or_not_found(records, || format!("No category with id {category_id}"))?;
        Ok(json!({ "category": category }))
    }
}

/// Searches categories by name
pub struct GetCategoriesByName;

#[async_trait]
impl McpTool for GetCategoriesByName {
    fn name(&self) -> ToolName {
        ToolName::GetCategoriesByName
    }

    fn description(&self) -> &'static str {
        "Find product categories whose name contains the text (case-insensitive)"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "name",
            ParamType::String,
            "Part of the category name",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let categories = state.client().search_read(&by_name(args.str("name")?)?).await?;
        listing("categories", &categories)
    }
}

/// Lists the direct children of a category
pub struct GetCategoriesChildren;

#[async_trait]
impl McpTool for GetCategoriesChildren {
    fn name(&self) -> ToolName {
        ToolName::GetCategoriesChildren
    }

    fn description(&self) -> &'static str {
        "List the immediate subcategories of a category"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "parent_id",
            ParamType::Integer,
            "Parent category id",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let query = children_of(args.int("parent_id")?)?;
        let children = state.client().search_read(&query).await?;
        listing("child_categories", &children)
    }
}

/// Reads the parent of a category
pub struct GetCategoryParent;

#[async_trait]
impl McpTool for GetCategoryParent {
    fn name(&self) -> ToolName {
        ToolName::GetCategoryParent
    }

    fn description(&self) -> &'static str {
        "Get the parent of a product category"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "child_id",
            ParamType::Integer,
            "Child category id",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let child_id = args.int("child_id")?;
        let records = state.client().search_read(&parent_of(child_id)?).await?;
        let parent = first_or_not_found(records, || format!("Category {child_id} has no parent"))?;
        Ok(json!({ "parent_category": parent }))
    }
}

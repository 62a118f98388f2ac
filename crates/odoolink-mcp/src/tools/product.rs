// ABOUTME: MCP tools for product lookups across templates and variants
// ABOUTME: Covers catalogue listing, id/SKU/name search, and category-subtree listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use futures::future::try_join_all;
use odoolink::query::product::{
    by_name, catalogue, dedupe_by_reference, identifiable, in_category_tree, ProductLookup,
    LOOKUP_MODELS,
};
use odoolink::query::{category, non_blank};
use odoolink::{BridgeError, EntityRef, Model, OdooClient, Record};
use serde_json::{json, Map, Value};

use crate::schema::{InputSchema, ParamSpec, ParamType, ToolArgs};
use crate::state::SharedState;
use crate::tools::{listing, McpTool, ToolName};

/// Try each lookup model in turn and return the first hit
async fn find_product(
    client: &OdooClient,
    lookup: &ProductLookup,
) -> Result<Option<Record>, BridgeError> {
    for model in LOOKUP_MODELS {
        if let Some(found) = client.search_read(&lookup.query(model)?).await?.into_iter().next() {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Lists sellable products
pub struct GetAllProducts;

#[async_trait]
impl McpTool for GetAllProducts {
    fn name(&self) -> ToolName {
        ToolName::GetAllProducts
    }

    fn description(&self) -> &'static str {
        "List active products that are in stock and have a price"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::empty()
    }

    async fn execute(&self, state: &SharedState, _args: ToolArgs) -> Result<Value, BridgeError> {
        let client = state.client();
        let variants = catalogue(Model::ProductVariant)?;
        let templates = catalogue(Model::ProductTemplate)?;
        let (mut products, templates) =
            tokio::try_join!(client.search_read(&variants), client.search_read(&templates))?;
        products.extend(templates);
        listing("products", &dedupe_by_reference(products))
    }
}

/// Reads one product by id
pub struct GetProductById;

#[async_trait]
impl McpTool for GetProductById {
    fn name(&self) -> ToolName {
        ToolName::GetProductById
    }

    fn description(&self) -> &'static str {
        "Get a product by id (product template first, then variant)"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "product_id",
            ParamType::Integer,
            "Product id",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let product_id = args.int("product_id")?;
        let lookup = ProductLookup::id(product_id)?;
        let product = find_product(state.client(), &lookup)
            .await?
            .ok_or_else(|| BridgeError::not_found(format!("No product with id {product_id}")))?;
        Ok(json!({ "product": product }))
    }
}

/// Reads one product by internal reference
pub struct GetProductBySku;

#[async_trait]
impl McpTool for GetProductBySku {
    fn name(&self) -> ToolName {
        ToolName::GetProductBySku
    }

    fn description(&self) -> &'static str {
        "Get a product by its internal reference (SKU)"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "sku",
            ParamType::String,
            "Internal reference",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let sku = non_blank("sku", args.str("sku")?)?;
        let lookup = ProductLookup::sku(sku)?;
        let product = find_product(state.client(), &lookup)
            .await?
            .ok_or_else(|| BridgeError::not_found(format!("No product with SKU '{sku}'")))?;
        Ok(json!({ "product": product }))
    }
}

/// Searches products by name
pub struct GetProductsByName;

#[async_trait]
impl McpTool for GetProductsByName {
    fn name(&self) -> ToolName {
        ToolName::GetProductsByName
    }

    fn description(&self) -> &'static str {
        "Search active products by name; every word must appear, in order"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "name",
            ParamType::String,
            "Words to search for",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let name = args.str("name")?;
        let templates = by_name(Model::ProductTemplate, name)?;
        let variants = by_name(Model::ProductVariant, name)?;
        let client = state.client();
        let (mut products, variants) =
            tokio::try_join!(client.search_read(&templates), client.search_read(&variants))?;
        products.extend(variants);
        listing("products", &dedupe_by_reference(identifiable(products)))
    }
}

/// Lists products in a category and its descendants
pub struct GetProductsByCategoryId;

#[async_trait]
impl McpTool for GetProductsByCategoryId {
    fn name(&self) -> ToolName {
        ToolName::GetProductsByCategoryId
    }

    fn description(&self) -> &'static str {
        "List active products in a category, including its subcategories"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "category_id",
            ParamType::Integer,
            "Product category id",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let query = in_category_tree(args.int("category_id")?)?;
        let products = state.client().search_read(&query).await?;
        listing("products", &products)
    }
}

/// Groups products by every category whose name matches
pub struct GetProductsByCategoryName;

#[async_trait]
impl McpTool for GetProductsByCategoryName {
    fn name(&self) -> ToolName {
        ToolName::GetProductsByCategoryName
    }

    fn description(&self) -> &'static str {
        "List products for each category whose name contains the text"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "category_name",
            ParamType::String,
            "Part of the category name",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let name = non_blank("category_name", args.str("category_name")?)?;
        let client = state.client();
        let categories = EntityRef::from_records(client.search_read(&category::by_name(name)?).await?)?;

        let queries = categories
            .iter()
            .map(|c| in_category_tree(c.id))
            .collect::<Result<Vec<_>, _>>()?;
        let listings = try_join_all(queries.iter().map(|q| client.search_read(q))).await?;

        let mut grouped = Map::new();
        for (category, products) in categories.iter().zip(listings) {
            let label = category
                .str_field("complete_name")
                .or_else(|| category.str_field("name"))
                .map_or_else(|| category.id.to_string(), ToOwned::to_owned);
            grouped.insert(label, Value::Array(products.into_iter().map(Value::Object).collect()));
        }
        Ok(json!({ "products_by_category": grouped }))
    }
}

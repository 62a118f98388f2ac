// ABOUTME: Tool registry mapping the closed set of Odoo tool names to handler implementations
// ABOUTME: Provides ToolName, the McpTool trait, and ToolRegistry with insertion-ordered discovery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

pub mod analytics;
pub mod category;
pub mod helpdesk;
pub mod inventory;
pub mod invoice;
pub mod lead;
pub mod partner;
pub mod product;
pub mod sale_order;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use odoolink::{BridgeError, Record};
use serde_json::{json, Value};

use crate::protocol::ToolDefinition;
use crate::schema::{InputSchema, ToolArgs};
use crate::state::SharedState;

/// Every tool this server can expose, in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// `create_partner`
    CreatePartner,
    /// `get_partner`
    GetPartner,
    /// `create_lead`
    CreateLead,
    /// `create_sale_order_by_product_id`
    CreateSaleOrderByProductId,
    /// `get_sale_orders_by_partner`
    GetSaleOrdersByPartner,
    /// `get_sale_orders_by_marketplace`
    GetSaleOrdersByMarketplace,
    /// `get_sale_order_by_name`
    GetSaleOrderByName,
    /// `get_sale_order_by_id`
    GetSaleOrderById,
    /// `get_orders_by_date`
    GetOrdersByDate,
    /// `get_all_products`
    GetAllProducts,
    /// `get_product_by_id`
    GetProductById,
    /// `get_product_by_sku`
    GetProductBySku,
    /// `get_products_by_name`
    GetProductsByName,
    /// `get_products_by_category_id`
    GetProductsByCategoryId,
    /// `get_products_by_category_name`
    GetProductsByCategoryName,
    /// `get_all_categories`
    GetAllCategories,
    /// `get_category_by_id`
    GetCategoryById,
    /// `get_categories_by_name`
    GetCategoriesByName,
    /// `get_categories_children`
    GetCategoriesChildren,
    /// `get_category_parent`
    GetCategoryParent,
    /// `get_pending_invoices`
    GetPendingInvoices,
    /// `get_top_customers`
    GetTopCustomers,
    /// `get_top_selling_products`
    GetTopSellingProducts,
    /// `get_helpdesk_tickets`
    GetHelpdeskTickets,
    /// `create_helpdesk_ticket`
    CreateHelpdeskTicket,
    /// `get_replenishment_info`
    GetReplenishmentInfo,
}

impl ToolName {
    /// All tools in registration order
    pub const ALL: [Self; 26] = [
        Self::CreatePartner,
        Self::GetPartner,
        Self::CreateLead,
        Self::CreateSaleOrderByProductId,
        Self::GetSaleOrdersByPartner,
        Self::GetSaleOrdersByMarketplace,
        Self::GetSaleOrderByName,
        Self::GetSaleOrderById,
        Self::GetOrdersByDate,
        Self::GetAllProducts,
        Self::GetProductById,
        Self::GetProductBySku,
        Self::GetProductsByName,
        Self::GetProductsByCategoryId,
        Self::GetProductsByCategoryName,
        Self::GetAllCategories,
        Self::GetCategoryById,
        Self::GetCategoriesByName,
        Self::GetCategoriesChildren,
        Self::GetCategoryParent,
        Self::GetPendingInvoices,
        Self::GetTopCustomers,
        Self::GetTopSellingProducts,
        Self::GetHelpdeskTickets,
        Self::CreateHelpdeskTicket,
        Self::GetReplenishmentInfo,
    ];

    /// Wire name used in `tools/list` and `tools/call`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatePartner => "create_partner",
            Self::GetPartner => "get_partner",
            Self::CreateLead => "create_lead",
            Self::CreateSaleOrderByProductId => "create_sale_order_by_product_id",
            Self::GetSaleOrdersByPartner => "get_sale_orders_by_partner",
            Self::GetSaleOrdersByMarketplace => "get_sale_orders_by_marketplace",
            Self::GetSaleOrderByName => "get_sale_order_by_name",
            Self::GetSaleOrderById => "get_sale_order_by_id",
            Self::GetOrdersByDate => "get_orders_by_date",
            Self::GetAllProducts => "get_all_products",
            Self::GetProductById => "get_product_by_id",
            Self::GetProductBySku => "get_product_by_sku",
            Self::GetProductsByName => "get_products_by_name",
            Self::GetProductsByCategoryId => "get_products_by_category_id",
            Self::GetProductsByCategoryName => "get_products_by_category_name",
            Self::GetAllCategories => "get_all_categories",
            Self::GetCategoryById => "get_category_by_id",
            Self::GetCategoriesByName => "get_categories_by_name",
            Self::GetCategoriesChildren => "get_categories_children",
            Self::GetCategoryParent => "get_category_parent",
            Self::GetPendingInvoices => "get_pending_invoices",
            Self::GetTopCustomers => "get_top_customers",
            Self::GetTopSellingProducts => "get_top_selling_products",
            Self::GetHelpdeskTickets => "get_helpdesk_tickets",
            Self::CreateHelpdeskTicket => "create_helpdesk_ticket",
            Self::GetReplenishmentInfo => "get_replenishment_info",
        }
    }

    /// Look a wire name up in the closed set
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait implemented by each MCP tool exposed by this server
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Identifier this handler serves
    fn name(&self) -> ToolName;

    /// One-line description shown to clients
    fn description(&self) -> &'static str;

    /// Accepted arguments
    fn schema(&self) -> InputSchema;

    /// Run against the backend with arguments that already passed [`schema`](Self::schema)
    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError>;
}

/// Handler bound to each tool identifier
///
/// The match is exhaustive, so adding a [`ToolName`] without a handler does
/// not compile.
pub fn handler_for(name: ToolName) -> Arc<dyn McpTool> {
    match name {
        ToolName::CreatePartner => Arc::new(partner::CreatePartner),
        ToolName::GetPartner => Arc::new(partner::GetPartner),
        ToolName::CreateLead => Arc::new(lead::CreateLead),
        ToolName::CreateSaleOrderByProductId => Arc::new(sale_order::CreateSaleOrderByProductId),
        ToolName::GetSaleOrdersByPartner => Arc::new(sale_order::GetSaleOrdersByPartner),
        ToolName::GetSaleOrdersByMarketplace => Arc::new(sale_order::GetSaleOrdersByMarketplace),
        ToolName::GetSaleOrderByName => Arc::new(sale_order::GetSaleOrderByName),
        ToolName::GetSaleOrderById => Arc::new(sale_order::GetSaleOrderById),
        ToolName::GetOrdersByDate => Arc::new(sale_order::GetOrdersByDate),
        ToolName::GetAllProducts => Arc::new(product::GetAllProducts),
        ToolName::GetProductById => Arc::new(product::GetProductById),
        ToolName::GetProductBySku => Arc::new(product::GetProductBySku),
        ToolName::GetProductsByName => Arc::new(product::GetProductsByName),
        ToolName::GetProductsByCategoryId => Arc::new(product::GetProductsByCategoryId),
        ToolName::GetProductsByCategoryName => Arc::new(product::GetProductsByCategoryName),
        ToolName::GetAllCategories => Arc::new(category::GetAllCategories),
        ToolName::GetCategoryById => Arc::new(category::GetCategoryById),
        ToolName::GetCategoriesByName => Arc::new(category::GetCategoriesByName),
        ToolName::GetCategoriesChildren => Arc::new(category::GetCategoriesChildren),
        ToolName::GetCategoryParent => Arc::new(category::GetCategoryParent),
        ToolName::GetPendingInvoices => Arc::new(invoice::GetPendingInvoices),
        ToolName::GetTopCustomers => Arc::new(analytics::GetTopCustomers),
        ToolName::GetTopSellingProducts => Arc::new(analytics::GetTopSellingProducts),
        ToolName::GetHelpdeskTickets => Arc::new(helpdesk::GetHelpdeskTickets),
        ToolName::CreateHelpdeskTicket => Arc::new(helpdesk::CreateHelpdeskTicket),
        ToolName::GetReplenishmentInfo => Arc::new(inventory::GetReplenishmentInfo),
    }
}

/// Immutable registry entry: identity, schema, and bound handler
pub struct ToolDescriptor {
    name: ToolName,
    description: &'static str,
    schema: InputSchema,
    handler: Arc<dyn McpTool>,
}

impl ToolDescriptor {
    /// Capture a handler's declared identity and schema
    pub fn new(handler: Arc<dyn McpTool>) -> Self {
        Self {
            name: handler.name(),
            description: handler.description(),
            schema: handler.schema(),
            handler,
        }
    }

    /// Tool identifier
    pub const fn name(&self) -> ToolName {
        self.name
    }

    /// Accepted arguments
    pub const fn schema(&self) -> &InputSchema {
        &self.schema
    }

    /// Bound handler
    pub fn handler(&self) -> Arc<dyn McpTool> {
        Arc::clone(&self.handler)
    }

    /// MCP definition for `tools/list`
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.as_str(),
            description: self.description,
            input_schema: self.schema.to_json_schema(),
        }
    }
}

/// Registry of tool descriptors, listed in registration order
///
/// Populated once at startup and read-only afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<ToolName, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool handler
    ///
    /// Registering the same name twice is a programming error reported as
    /// `Internal`; the server refuses to start.
    pub fn register(&mut self, handler: Arc<dyn McpTool>) -> Result<(), BridgeError> {
        let descriptor = ToolDescriptor::new(handler);
        let name = descriptor.name();
        if self.index.contains_key(&name) {
            return Err(BridgeError::internal(format!(
                "Tool '{name}' is registered twice"
            )));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// Find a tool by wire name
    pub fn resolve(&self, name: &str) -> Result<&ToolDescriptor, BridgeError> {
        ToolName::parse(name)
            .and_then(|tool| self.index.get(&tool))
            .and_then(|&slot| self.tools.get(slot))
            .ok_or_else(|| BridgeError::tool_not_found(name))
    }

    /// Registered descriptors in registration order
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Definitions for `tools/list` responses, in registration order
    pub fn list_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolDescriptor::definition).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Build the registry with every Odoo tool
///
/// Fails when a handler reports a name other than the one it is bound to.
pub fn build_tool_registry() -> Result<ToolRegistry, BridgeError> {
    let mut registry = ToolRegistry::new();
    for name in ToolName::ALL {
        let handler = handler_for(name);
        if handler.name() != name {
            return Err(BridgeError::internal(format!(
                "Handler bound to '{name}' reports '{}'",
                handler.name()
            )));
        }
        registry.register(handler)?;
    }
    Ok(registry)
}

// ============================================================================
// Payload Helpers
// ============================================================================

/// `{"<key>": [...], "count": n}`
pub(crate) fn listing<T: serde::Serialize>(key: &str, items: &[T]) -> Result<Value, BridgeError> {
    let items = serde_json::to_value(items)
        .map_err(|e| BridgeError::internal(format!("Failed to serialize {key}: {e}")))?;
    Ok(json!({ key: items, "count": items.as_array().map_or(0, Vec::len) }))
}

/// First record, or `NotFound` naming what was looked up
pub(crate) fn first_or_not_found(
    records: Vec<Record>,
    what: impl FnOnce() -> String,
) -> Result<Record, BridgeError> {
    records
        .into_iter()
        .next()
        .ok_or_else(|| BridgeError::not_found(what()))
}

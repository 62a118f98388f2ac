// ABOUTME: MCP tools for sale orders: single-product order creation and lookups by id, partner, name, marketplace, or date
// ABOUTME: Orders returned with full fields carry a customer portal link
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use odoolink::query::product::ProductLookup;
use odoolink::query::sale_order::{
    attach_portal_link, by_date, by_id, by_marketplace, by_name, by_partner, header_values,
    line_quantity, line_values,
};
use odoolink::query::{positive_id, DateRange};
use odoolink::{BridgeError, EntityRef, Model, OdooClient, ReadQuery, Record};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::schema::{InputSchema, ParamSpec, ParamType, ToolArgs};
use crate::state::SharedState;
use crate::tools::{first_or_not_found, listing, McpTool, ToolName};

/// Run an order query and add portal links to every row
async fn orders_with_links(
    client: &OdooClient,
    query: &ReadQuery,
) -> Result<Vec<Record>, BridgeError> {
    let mut orders = client.search_read(query).await?;
    for order in &mut orders {
        attach_portal_link(order, client.base_url());
    }
    Ok(orders)
}

/// Read one order by id with its portal link
async fn order_by_id(client: &OdooClient, order_id: i64) -> Result<Record, BridgeError> {
    let orders = orders_with_links(client, &by_id(order_id)?).await?;
    first_or_not_found(orders, || format!("No sale order with id {order_id}"))
}

/// Creates a quotation with one line for the given product
pub struct CreateSaleOrderByProductId;

#[async_trait]
impl McpTool for CreateSaleOrderByProductId {
    fn name(&self) -> ToolName {
        ToolName::CreateSaleOrderByProductId
    }

    fn description(&self) -> &'static str {
        "Create a sale order for a customer with a single product line priced at list price"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ParamSpec::required("partner_id", ParamType::Integer, "Customer id"),
            ParamSpec::required("product_id", ParamType::Integer, "Product variant id"),
            ParamSpec::optional("quantity", ParamType::Integer, "Units to order").with_default(1),
        ])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let partner_id = positive_id("partner_id", args.int("partner_id")?)?;
        let product_id = positive_id("product_id", args.int("product_id")?)?;
        let quantity = line_quantity(args.int("quantity")?)?;
        let client = state.client();

        let product = first_or_not_found(
            client
                .search_read(&ProductLookup::Id(product_id).query(Model::ProductVariant)?)
                .await?,
            || format!("No product with id {product_id}"),
        )?;
        let product = EntityRef::from_record(product)?;

        let access_token = Uuid::new_v4().simple().to_string();
        let order_id = client
            .create(Model::SaleOrder, header_values(partner_id, &access_token)?)
            .await?;
        info!(order_id, partner_id, "Sale order header created");

        if let Err(e) = client
            .create(Model::SaleOrderLine, line_values(order_id, &product, quantity))
            .await
        {
            warn!(order_id, error = %e, "Order line creation failed, header left in place");
            let detail = match &e.detail {
                Some(inner) => format!("sale.order id {order_id} exists without lines; {inner}"),
                None => format!("sale.order id {order_id} exists without lines"),
            };
            return Err(BridgeError::backend_fault(format!(
                "Sale order {order_id} was created but its line could not be added: {}",
                e.message
            ))
            .with_detail(detail));
        }

        let order = order_by_id(client, order_id).await?;
        Ok(json!({ "sale_order": order }))
    }
}

/// Lists every order of a partner
pub struct GetSaleOrdersByPartner;

#[async_trait]
impl McpTool for GetSaleOrdersByPartner {
    fn name(&self) -> ToolName {
        ToolName::GetSaleOrdersByPartner
    }

    fn description(&self) -> &'static str {
        "List a customer's sale orders, newest first"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "partner_id",
            ParamType::Integer,
            "Customer id",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let query = by_partner(args.int("partner_id")?)?;
        let orders = orders_with_links(state.client(), &query).await?;
        listing("sale_orders", &orders)
    }
}

/// Lists orders whose marketplace label matches
pub struct GetSaleOrdersByMarketplace;

#[async_trait]
impl McpTool for GetSaleOrdersByMarketplace {
    fn name(&self) -> ToolName {
        ToolName::GetSaleOrdersByMarketplace
    }

    fn description(&self) -> &'static str {
        "List sale orders coming from a marketplace (case-insensitive partial match)"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "marketplace",
            ParamType::String,
            "Marketplace name, e.g. Amazon",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let query = by_marketplace(state.marketplace_field(), args.str("marketplace")?)?;
        let orders = orders_with_links(state.client(), &query).await?;
        listing("sale_orders", &orders)
    }
}

/// Searches orders by number or reference
pub struct GetSaleOrderByName;

#[async_trait]
impl McpTool for GetSaleOrderByName {
    fn name(&self) -> ToolName {
        ToolName::GetSaleOrderByName
    }

    fn description(&self) -> &'static str {
        "Find sale orders whose number, customer reference, or source document contains the text"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "name",
            ParamType::String,
            "Order number or reference, e.g. S00042",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let query = by_name(args.str("name")?)?;
        let orders = orders_with_links(state.client(), &query).await?;
        listing("sale_orders", &orders)
    }
}

/// Reads one order by id
pub struct GetSaleOrderById;

#[async_trait]
impl McpTool for GetSaleOrderById {
    fn name(&self) -> ToolName {
        ToolName::GetSaleOrderById
    }

    fn description(&self) -> &'static str {
        "Get a sale order by id"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![ParamSpec::required(
            "order_id",
            ParamType::Integer,
            "Sale order id",
        )])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let order = order_by_id(state.client(), args.int("order_id")?).await?;
        Ok(json!({ "sale_order": order }))
    }
}

/// Lists orders placed inside an inclusive date window
pub struct GetOrdersByDate;

#[async_trait]
impl McpTool for GetOrdersByDate {
    fn name(&self) -> ToolName {
        ToolName::GetOrdersByDate
    }

    fn description(&self) -> &'static str {
        "List sale orders dated between two days, both inclusive"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ParamSpec::required("date_from", ParamType::String, "First day, YYYY-MM-DD"),
            ParamSpec::required("date_to", ParamType::String, "Last day, YYYY-MM-DD"),
        ])
    }

    async fn execute(&self, state: &SharedState, args: ToolArgs) -> Result<Value, BridgeError> {
        let range = DateRange::parse(args.str("date_from")?, args.str("date_to")?)?;
        let orders = state.client().search_read(&by_date(&range)?).await?;
        listing("orders", &orders)
    }
}

// ABOUTME: Top-customer and top-selling-product rankings over a bounded date window
// ABOUTME: Resolves default window and limit, then aggregates confirmed sales deterministically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! Rankings are computed client-side from raw orders and order lines,
//! read page by page. Scans are ordered largest first, so a scan stopped at
//! its row ceiling only loses the smallest rows. Equal totals are ordered by
//! ascending entity id so that repeated calls over unchanged data return
//! identical sequences.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use serde_json::json;

use crate::domain::{DomainBuilder, Model, Operator, ReadQuery};
use crate::query::{parse_date, DateRange};
use crate::types::{many2one, number, BridgeError, Record};

/// Ranking size when the caller does not pass one
pub const DEFAULT_TOP_LIMIT: i64 = 10;

/// Largest accepted ranking size
pub const MAX_TOP_LIMIT: i64 = 100;

/// Length of the default window in days, ending today inclusive
pub const DEFAULT_WINDOW_DAYS: u64 = 30;

/// Rows fetched per round-trip while scanning
pub const SCAN_PAGE_SIZE: u32 = 1_000;

/// Ceiling on orders read for one customer ranking
pub const MAX_SCANNED_ORDERS: usize = 100_000;

/// Ceiling on order lines read for one product ranking
pub const MAX_SCANNED_LINES: usize = 250_000;

/// Order states counted as sales
const CONFIRMED_STATES: [&str; 2] = ["sale", "done"];

/// Resolved time window and ranking size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopWindow {
    /// Inclusive date window
    pub range: DateRange,
    /// Number of entries to return
    pub limit: usize,
}

impl TopWindow {
    /// Fill in defaults and validate
    ///
    /// Without `date_to` the window ends `today`; without `date_from` it
    /// spans [`DEFAULT_WINDOW_DAYS`] days ending on `date_to`.
    pub fn resolve(
        date_from: Option<&str>,
        date_to: Option<&str>,
        limit: i64,
        today: NaiveDate,
    ) -> Result<Self, BridgeError> {
        if !(1..=MAX_TOP_LIMIT).contains(&limit) {
            return Err(BridgeError::invalid_argument(format!(
                "'limit' must be between 1 and {MAX_TOP_LIMIT}, got {limit}"
            )));
        }

        let to = date_to
            .map(|raw| parse_date("date_to", raw))
            .transpose()?
            .unwrap_or(today);
        let from = match date_from {
            Some(raw) => parse_date("date_from", raw)?,
            None => to
                .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS - 1))
                .unwrap_or(NaiveDate::MIN),
        };

        Ok(Self {
            range: DateRange::new(from, to)?,
            limit: limit as usize,
        })
    }
}

/// Confirmed orders dated inside the window, largest amount first
///
/// No limit is set; page it with `OdooClient::scan`.
pub fn confirmed_orders(window: &TopWindow) -> Result<ReadQuery, BridgeError> {
    let domain = DomainBuilder::new(Model::SaleOrder)
        .clause("state", Operator::In, json!(CONFIRMED_STATES))
        .clause("date_order", Operator::Ge, window.range.start_bound())
        .clause("date_order", Operator::Le, window.range.end_bound())
        .build()?;
    Ok(
        ReadQuery::new(domain, &["id", "name", "partner_id", "amount_total", "date_order", "state"])
            .order_by("amount_total desc, id"),
    )
}

/// Lines of confirmed orders created inside the window, largest quantity first
pub fn confirmed_lines(window: &TopWindow) -> Result<ReadQuery, BridgeError> {
    let domain = DomainBuilder::new(Model::SaleOrderLine)
        .clause("state", Operator::In, json!(CONFIRMED_STATES))
        .clause("create_date", Operator::Ge, window.range.start_bound())
        .clause("create_date", Operator::Le, window.range.end_bound())
        .build()?;
    Ok(
        ReadQuery::new(domain, &["id", "order_id", "product_id", "product_uom_qty", "price_total"])
            .order_by("product_uom_qty desc, id"),
    )
}

/// Sales total for one customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTotal {
    /// Partner id
    pub partner_id: i64,
    /// Partner display name
    pub partner_name: String,
    /// Sum of order totals
    pub amount_total: f64,
    /// Number of orders
    pub orders: u32,
}

/// Sales volume for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    /// Product variant id
    pub product_id: i64,
    /// Product display name
    pub product_name: String,
    /// Quantity sold
    pub qty: f64,
    /// Revenue including taxes
    pub revenue: f64,
}

/// Aggregate orders per partner; highest total first, ties by partner id
pub fn rank_customers(orders: &[Record], limit: usize) -> Vec<CustomerTotal> {
    let mut totals: BTreeMap<i64, CustomerTotal> = BTreeMap::new();
    for order in orders {
        let Some((partner_id, partner_name)) = order.get("partner_id").and_then(many2one) else {
            continue;
        };
        let entry = totals.entry(partner_id).or_insert_with(|| CustomerTotal {
            partner_id,
            partner_name: partner_name.to_owned(),
            amount_total: 0.0,
            orders: 0,
        });
        entry.amount_total += number(order, "amount_total");
        entry.orders += 1;
    }

    let mut ranked: Vec<CustomerTotal> = totals.into_values().collect();
    ranked.sort_by(|a, b| by_value_then_id(a.amount_total, b.amount_total, a.partner_id, b.partner_id));
    ranked.truncate(limit);
    ranked
}

/// Aggregate order lines per product; highest quantity first, ties by product id
pub fn rank_products(lines: &[Record], limit: usize) -> Vec<ProductSales> {
    let mut totals: BTreeMap<i64, ProductSales> = BTreeMap::new();
    for line in lines {
        let Some((product_id, product_name)) = line.get("product_id").and_then(many2one) else {
            continue;
        };
        let entry = totals.entry(product_id).or_insert_with(|| ProductSales {
            product_id,
            product_name: product_name.to_owned(),
            qty: 0.0,
            revenue: 0.0,
        });
        entry.qty += number(line, "product_uom_qty");
        entry.revenue += number(line, "price_total");
    }

    let mut ranked: Vec<ProductSales> = totals.into_values().collect();
    ranked.sort_by(|a, b| by_value_then_id(a.qty, b.qty, a.product_id, b.product_id));
    ranked.truncate(limit);
    ranked
}

/// Descending by value, ascending by id
fn by_value_then_id(a_value: f64, b_value: f64, a_id: i64, b_id: i64) -> Ordering {
    b_value.total_cmp(&a_value).then(a_id.cmp(&b_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use serde_json::Value;

    fn record(raw: Value) -> Record {
        let Value::Object(map) = raw else {
            unreachable!()
        };
        map
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).expect("date")
    }

    #[test]
    fn default_window_is_thirty_days_ending_today() {
        let window = TopWindow::resolve(None, None, DEFAULT_TOP_LIMIT, today()).expect("window");
        assert_eq!(window.range.from(), NaiveDate::from_ymd_opt(2024, 3, 2).expect("date"));
        assert_eq!(window.range.to(), today());
        assert_eq!(window.limit, 10);
    }

    #[test]
    fn explicit_window_is_kept() {
        let window =
            TopWindow::resolve(Some("2024-01-01"), Some("2024-01-31"), 5, today()).expect("window");
        assert_eq!(window.range.start_bound(), "2024-01-01 00:00:00");
        assert_eq!(window.limit, 5);
    }

    #[test]
    fn future_start_without_end_is_invalid() {
        let err = TopWindow::resolve(Some("2024-05-01"), None, 10, today()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn limit_out_of_range_is_invalid() {
        assert!(TopWindow::resolve(None, None, 0, today()).is_err());
        assert!(TopWindow::resolve(None, None, 101, today()).is_err());
    }

    #[test]
    fn customers_ranked_by_total_with_id_tiebreak() {
        let orders = vec![
            record(json!({"partner_id": [9, "Zed"], "amount_total": 50.0})),
            record(json!({"partner_id": [4, "Ana"], "amount_total": 30.0})),
            record(json!({"partner_id": [4, "Ana"], "amount_total": 20.0})),
            record(json!({"partner_id": [7, "Bo"], "amount_total": 80.0})),
            record(json!({"partner_id": false, "amount_total": 999.0})),
        ];
        let ranked = rank_customers(&orders, 10);
        let ids: Vec<i64> = ranked.iter().map(|c| c.partner_id).collect();
        assert_eq!(ids, [7, 4, 9]);
        assert_eq!(ranked[1].orders, 2);
    }

    #[test]
    fn products_ranked_by_quantity_and_truncated() {
        let lines = vec![
            record(json!({"product_id": [3, "Mug"], "product_uom_qty": 2, "price_total": 10.0})),
            record(json!({"product_id": [1, "Cup"], "product_uom_qty": 2, "price_total": 8.0})),
            record(json!({"product_id": [2, "Pot"], "product_uom_qty": 1, "price_total": 30.0})),
        ];
        let ranked = rank_products(&lines, 2);
        let ids: Vec<i64> = ranked.iter().map(|p| p.product_id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn order_scan_filters_confirmed_states() {
        let window = TopWindow::resolve(None, None, 10, today()).expect("window");
        let query = confirmed_orders(&window).expect("query");
        let state = query.domain.clause("state").expect("state clause");
        assert_eq!(state.value, json!(["sale", "done"]));
        assert_eq!(query.order, Some("amount_total desc, id"));
        assert_eq!(query.limit, None);
    }

    #[test]
    fn line_scan_is_largest_quantity_first() {
        let window = TopWindow::resolve(None, None, 10, today()).expect("window");
        let query = confirmed_lines(&window).expect("query");
        assert_eq!(query.order, Some("product_uom_qty desc, id"));
        assert_eq!(query.limit, None);
    }
}

// ABOUTME: Replenishment reads over warehouse reorder rules, for one product or all
// ABOUTME: Reports min/max levels, forecast, and quantity the backend suggests ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use crate::domain::{DomainBuilder, Model, ReadQuery};
use crate::query::positive_id;
use crate::types::BridgeError;

/// Fields returned for a reorder rule
pub const ORDERPOINT_FIELDS: &[&str] = &[
    "id",
    "name",
    "product_id",
    "warehouse_id",
    "location_id",
    "product_min_qty",
    "product_max_qty",
    "qty_forecast",
    "qty_to_order",
    "trigger",
];

/// Maximum reorder rules returned in one call
const ORDERPOINT_LIMIT: u32 = 100;

/// Active reorder rules, optionally restricted to one product
pub fn orderpoints(product_id: Option<i64>) -> Result<ReadQuery, BridgeError> {
    let mut builder = DomainBuilder::new(Model::Orderpoint).eq("active", true);
    if let Some(product_id) = product_id {
        builder = builder.eq("product_id", positive_id("product_id", product_id)?);
    }
    Ok(ReadQuery::new(builder.build()?, ORDERPOINT_FIELDS)
        .order_by("product_id, id")
        .limit(ORDERPOINT_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_filter_is_optional() {
        assert_eq!(
            orderpoints(None).expect("query").domain.to_value(),
            json!([["active", "=", true]])
        );
        assert_eq!(
            orderpoints(Some(4)).expect("query").domain.to_value(),
            json!([["active", "=", true], ["product_id", "=", 4]])
        );
    }
}

// ABOUTME: Per-entity query builders translating tool semantics into validated Odoo reads and writes
// ABOUTME: Hosts shared input checks such as inclusive date ranges and positive record ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Query Builders
//!
//! One module per entity family. Every function here is pure: it turns
//! already-typed tool arguments into a [`ReadQuery`](crate::domain::ReadQuery)
//! or a value map for `create`, or reshapes records the backend returned.
//! Input problems surface as `InvalidArgument` before any backend call.

/// Top-N aggregation over sales data
pub mod analytics;
/// Product categories and their hierarchy
pub mod category;
/// Helpdesk tickets
pub mod helpdesk;
/// Replenishment (reorder rules)
pub mod inventory;
/// Customer invoices
pub mod invoice;
/// CRM leads
pub mod lead;
/// Partners (customers and suppliers)
pub mod partner;
/// Products (templates and variants)
pub mod product;
/// Sale orders and order lines
pub mod sale_order;

use std::fmt;

use chrono::NaiveDate;

use crate::types::BridgeError;

/// Accepted calendar date format for tool arguments
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar-date window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Build a window, rejecting `from > to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, BridgeError> {
        if from > to {
            return Err(BridgeError::invalid_argument(format!(
                "date_from ({from}) must not be after date_to ({to})"
            )));
        }
        Ok(Self { from, to })
    }

    /// Parse both bounds from `YYYY-MM-DD` strings
    pub fn parse(from: &str, to: &str) -> Result<Self, BridgeError> {
        Self::new(parse_date("date_from", from)?, parse_date("date_to", to)?)
    }

    /// First day of the window
    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last day of the window
    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    /// Datetime literal for the inclusive lower bound
    pub fn start_bound(&self) -> String {
        format!("{} 00:00:00", self.from.format(DATE_FORMAT))
    }

    /// Datetime literal for the inclusive upper bound (end of the last day)
    pub fn end_bound(&self) -> String {
        format!("{} 23:59:59", self.to.format(DATE_FORMAT))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, BridgeError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        BridgeError::invalid_argument(format!("'{field}' must be a YYYY-MM-DD date, got '{raw}'"))
    })
}

/// Reject ids the backend can never hold
pub fn positive_id(field: &str, id: i64) -> Result<i64, BridgeError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(BridgeError::invalid_argument(format!(
            "'{field}' must be a positive id, got {id}"
        )))
    }
}

/// Reject blank free-text arguments, returning them trimmed
pub fn non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, BridgeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(BridgeError::invalid_argument(format!("'{field}' must not be empty")))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn inverted_range_is_invalid() {
        let err = DateRange::parse("2024-03-10", "2024-03-01").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn single_day_range_covers_whole_day() {
        let range = DateRange::parse("2024-03-01", "2024-03-01").expect("valid");
        assert_eq!(range.start_bound(), "2024-03-01 00:00:00");
        assert_eq!(range.end_bound(), "2024-03-01 23:59:59");
    }

    #[test]
    fn malformed_date_names_the_field() {
        let err = DateRange::parse("03/01/2024", "2024-03-05").unwrap_err();
        assert!(err.message.contains("date_from"));
    }

    #[test]
    fn ids_must_be_positive() {
        assert!(positive_id("partner_id", 0).is_err());
        assert_eq!(positive_id("partner_id", 9).ok(), Some(9));
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(non_blank("name", "   ").is_err());
        assert_eq!(non_blank("name", " Ana ").ok(), Some("Ana"));
    }
}

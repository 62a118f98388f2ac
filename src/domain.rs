// ABOUTME: Typed domain-filter construction for Odoo models with per-model field validation
// ABOUTME: Replaces raw nested-list filter literals with an opaque, pre-validated Domain value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Domain Filters
//!
//! Odoo selects records with *domains*: prefix-notation lists of
//! `[field, operator, value]` clauses where `"|"` ORs the next two terms
//! and adjacent terms are implicitly ANDed. [`DomainBuilder`] produces a
//! [`Domain`] only after every field has been checked against its
//! [`Model`], so the adapter never forwards an unchecked literal.

use std::fmt;

use serde_json::Value;

use crate::types::BridgeError;

/// Backend models reachable through the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    /// `res.partner`
    Partner,
    /// `crm.lead`
    Lead,
    /// `sale.order`
    SaleOrder,
    /// `sale.order.line`
    SaleOrderLine,
    /// `product.template`
    ProductTemplate,
    /// `product.product`
    ProductVariant,
    /// `product.category`
    ProductCategory,
    /// `account.move`
    Invoice,
    /// `helpdesk.ticket`
    HelpdeskTicket,
    /// `stock.warehouse.orderpoint`
    Orderpoint,
}

impl Model {
    /// Technical model name sent over the wire
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Partner => "res.partner",
            Self::Lead => "crm.lead",
            Self::SaleOrder => "sale.order",
            Self::SaleOrderLine => "sale.order.line",
            Self::ProductTemplate => "product.template",
            Self::ProductVariant => "product.product",
            Self::ProductCategory => "product.category",
            Self::Invoice => "account.move",
            Self::HelpdeskTicket => "helpdesk.ticket",
            Self::Orderpoint => "stock.warehouse.orderpoint",
        }
    }

    /// Fields that may appear in a domain on this model
    pub const fn filterable_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Partner => &[
                "id",
                "name",
                "phone",
                "mobile",
                "email",
                "parent_id",
                "is_company",
                "company_type",
                "customer_rank",
                "supplier_rank",
                "vat",
                "active",
            ],
            Self::Lead => &["id", "name", "partner_id", "stage_id", "type", "email_from", "phone"],
            Self::SaleOrder => &[
                "id",
                "name",
                "partner_id",
                "date_order",
                "state",
                "amount_total",
                "origin",
                "client_order_ref",
                "user_id",
                "company_id",
            ],
            Self::SaleOrderLine => &[
                "id",
                "order_id",
                "product_id",
                "state",
                "create_date",
                "product_uom_qty",
                "price_total",
            ],
            Self::ProductTemplate => &[
                "id",
                "name",
                "default_code",
                "barcode",
                "categ_id",
                "active",
                "qty_available",
                "list_price",
                "type",
            ],
            Self::ProductVariant => &[
                "id",
                "name",
                "default_code",
                "barcode",
                "categ_id",
                "active",
                "qty_available",
                "list_price",
                "type",
                "product_tmpl_id",
            ],
            Self::ProductCategory => &["id", "name", "parent_id", "child_id", "complete_name"],
            Self::Invoice => &[
                "id",
                "partner_id",
                "move_type",
                "payment_state",
                "state",
                "invoice_date",
                "invoice_date_due",
            ],
            Self::HelpdeskTicket => &["id", "name", "partner_id", "stage_id", "user_id", "create_date"],
            Self::Orderpoint => &["id", "product_id", "warehouse_id", "location_id", "trigger", "active"],
        }
    }

    /// Whether `field` may be filtered on; custom studio fields (`x_`) always may
    pub fn accepts_field(&self, field: &str) -> bool {
        field.starts_with("x_") || self.filterable_fields().contains(&field)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison operators supported in domain clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `ilike`: case-insensitive substring match
    Ilike,
    /// `in`: value must be a list
    In,
    /// `not in`: value must be a list
    NotIn,
    /// `child_of`: record or any descendant in a parent hierarchy
    ChildOf,
}

impl Operator {
    /// Operator token as understood by the backend
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Ilike => "ilike",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::ChildOf => "child_of",
        }
    }

    const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

/// One `[field, operator, value]` comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Field name on the target model
    pub field: String,
    /// Comparison operator
    pub op: Operator,
    /// Right-hand side
    pub value: Value,
}

/// Prefix-notation element of a domain
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A field comparison
    Clause(Clause),
    /// Logical OR of the next two terms
    Or,
}

/// Validated filter bound to its model
///
/// Only obtainable from [`DomainBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    model: Model,
    terms: Vec<Term>,
}

impl Domain {
    /// Model this filter applies to
    pub const fn model(&self) -> Model {
        self.model
    }

    /// Comparison clauses, skipping logical operators
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.terms.iter().filter_map(|term| match term {
            Term::Clause(clause) => Some(clause),
            Term::Or => None,
        })
    }

    /// Find the first clause on `field`
    pub fn clause(&self, field: &str) -> Option<&Clause> {
        self.clauses().find(|clause| clause.field == field)
    }

    /// True when the filter matches every record
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Serialize to the backend's nested-list format
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.terms
                .iter()
                .map(|term| match term {
                    Term::Clause(clause) => Value::Array(vec![
                        Value::from(clause.field.as_str()),
                        Value::from(clause.op.as_str()),
                        clause.value.clone(),
                    ]),
                    Term::Or => Value::from("|"),
                })
                .collect(),
        )
    }
}

/// Accumulates clauses for one model and validates them on [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct DomainBuilder {
    model: Model,
    terms: Vec<Term>,
}

impl DomainBuilder {
    /// Start an empty (match-all) filter on `model`
    pub const fn new(model: Model) -> Self {
        Self {
            model,
            terms: Vec::new(),
        }
    }

    /// Append a clause ANDed with the previous ones
    #[must_use]
    pub fn clause(mut self, field: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.terms.push(Term::Clause(Clause {
            field: field.to_owned(),
            op,
            value: value.into(),
        }));
        self
    }

    /// Append `field = value`
    #[must_use]
    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.clause(field, Operator::Eq, value)
    }

    /// Append `field ilike value`
    #[must_use]
    pub fn ilike(self, field: &str, value: impl Into<Value>) -> Self {
        self.clause(field, Operator::Ilike, value)
    }

    /// Append a group of clauses of which at least one must match
    #[must_use]
    pub fn any_of(mut self, group: impl FnOnce(Self) -> Self) -> Self {
        let inner = group(Self::new(self.model));
        let clauses: Vec<Term> = inner
            .terms
            .into_iter()
            .filter(|term| matches!(term, Term::Clause(_)))
            .collect();
        let ors = clauses.len().saturating_sub(1);
        self.terms.extend(std::iter::repeat_n(Term::Or, ors));
        self.terms.extend(clauses);
        self
    }

    /// Validate every clause against the model
    ///
    /// An invalid field or a non-list operand for `in` is a programming
    /// error in a query builder, reported as `Internal`.
    pub fn build(self) -> Result<Domain, BridgeError> {
        for clause in self.terms.iter().filter_map(|term| match term {
            Term::Clause(clause) => Some(clause),
            Term::Or => None,
        }) {
            if !self.model.accepts_field(&clause.field) {
                return Err(BridgeError::internal(format!(
                    "Field '{}' is not filterable on {}",
                    clause.field, self.model
                )));
            }
            if clause.op.takes_list() && !clause.value.is_array() {
                return Err(BridgeError::internal(format!(
                    "Operator '{}' on {}.{} needs a list operand",
                    clause.op.as_str(),
                    self.model,
                    clause.field
                )));
            }
        }
        Ok(Domain {
            model: self.model,
            terms: self.terms,
        })
    }
}

/// A complete `search_read` request: filter, projected fields, ordering, limit
#[derive(Debug, Clone, PartialEq)]
pub struct ReadQuery {
    /// Validated filter (carries the model)
    pub domain: Domain,
    /// Fields to read
    pub fields: &'static [&'static str],
    /// Backend ordering clause, e.g. `"date_order desc"`
    pub order: Option<&'static str>,
    /// Maximum number of rows
    pub limit: Option<u32>,
    /// Rows to skip before the first returned one
    pub offset: Option<u32>,
}

impl ReadQuery {
    /// Read `fields` from every record matching `domain`
    pub const fn new(domain: Domain, fields: &'static [&'static str]) -> Self {
        Self {
            domain,
            fields,
            order: None,
            limit: None,
            offset: None,
        }
    }

    /// Set the ordering clause
    #[must_use]
    pub const fn order_by(mut self, order: &'static str) -> Self {
        self.order = Some(order);
        self
    }

    /// Cap the number of rows
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first `offset` matching rows
    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Target model
    pub const fn model(&self) -> Model {
        self.domain.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use serde_json::json;

    #[test]
    fn clauses_serialize_as_nested_lists() {
        let domain = DomainBuilder::new(Model::Partner)
            .eq("phone", "+34600000000")
            .build()
            .expect("valid");
        assert_eq!(domain.to_value(), json!([["phone", "=", "+34600000000"]]));
    }

    #[test]
    fn any_of_emits_prefix_ors() {
        let domain = DomainBuilder::new(Model::SaleOrder)
            .any_of(|b| {
                b.ilike("name", "S001")
                    .ilike("client_order_ref", "S001")
                    .ilike("origin", "S001")
            })
            .build()
            .expect("valid");
        assert_eq!(
            domain.to_value(),
            json!([
                "|",
                "|",
                ["name", "ilike", "S001"],
                ["client_order_ref", "ilike", "S001"],
                ["origin", "ilike", "S001"]
            ])
        );
    }

    #[test]
    fn unknown_field_is_rejected_at_build() {
        let err = DomainBuilder::new(Model::ProductCategory)
            .eq("amount_total", 1)
            .build()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(err.message.contains("product.category"));
    }

    #[test]
    fn studio_fields_are_accepted() {
        assert!(DomainBuilder::new(Model::SaleOrder)
            .ilike("x_studio_marketplace", "amazon")
            .build()
            .is_ok());
    }

    #[test]
    fn in_operator_requires_list() {
        assert!(DomainBuilder::new(Model::SaleOrder)
            .clause("state", Operator::In, "sale")
            .build()
            .is_err());
        assert!(DomainBuilder::new(Model::SaleOrder)
            .clause("state", Operator::In, json!(["sale", "done"]))
            .build()
            .is_ok());
    }

    #[test]
    fn empty_builder_matches_everything() {
        let domain = DomainBuilder::new(Model::ProductCategory).build().expect("valid");
        assert!(domain.is_empty());
        assert_eq!(domain.to_value(), json!([]));
    }
}

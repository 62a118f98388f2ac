// ABOUTME: Partner lookups by id, email, or phone and value maps for partner creation
// ABOUTME: Resolves multiple identifiers with a fixed precedence: id, then email, then phone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{DomainBuilder, Model, ReadQuery};
use crate::query::{non_blank, positive_id};
use crate::types::{BridgeError, Record};

/// Fields returned for a partner
pub const PARTNER_FIELDS: &[&str] = &[
    "id",
    "name",
    "company_type",
    "is_company",
    "parent_id",
    "phone",
    "mobile",
    "email",
    "website",
    "street",
    "street2",
    "city",
    "zip",
    "state_id",
    "country_id",
    "vat",
    "company_id",
    "customer_rank",
    "supplier_rank",
    "credit",
    "debit",
    "category_id",
    "lang",
    "industry_id",
    "type",
];

/// The single identifier a partner lookup is resolved by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartnerLookup {
    /// Record id
    Id(i64),
    /// Exact email address
    Email(String),
    /// Exact phone number
    Phone(String),
}

impl PartnerLookup {
    /// Pick one identifier from the optional arguments
    ///
    /// Precedence is id, then email, then phone; blank strings count as
    /// absent. Supplying none is an `InvalidArgument`.
    pub fn resolve(
        id: Option<i64>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, BridgeError> {
        let present = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToOwned::to_owned)
        };

        if let Some(id) = id {
            return positive_id("partner_id", id).map(Self::Id);
        }
        if let Some(email) = present(email) {
            return Ok(Self::Email(email));
        }
        if let Some(phone) = present(phone) {
            return Ok(Self::Phone(phone));
        }
        Err(BridgeError::invalid_argument(
            "One of 'partner_id', 'email' or 'phone' is required",
        ))
    }

    /// Read query returning at most one partner
    pub fn query(&self) -> Result<ReadQuery, BridgeError> {
        let builder = DomainBuilder::new(Model::Partner);
        let builder = match self {
            Self::Id(id) => builder.eq("id", *id),
            Self::Email(email) => builder.eq("email", email.as_str()),
            Self::Phone(phone) => builder.eq("phone", phone.as_str()),
        };
        Ok(ReadQuery::new(builder.build()?, PARTNER_FIELDS).limit(1))
    }
}

impl fmt::Display for PartnerLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Email(email) => write!(f, "email {email}"),
            Self::Phone(phone) => write!(f, "phone {phone}"),
        }
    }
}

/// Outcome of `create_partner`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartnerStatus {
    /// A partner with the phone already existed
    #[serde(rename = "ALREADY")]
    Already,
    /// A new partner was created
    #[serde(rename = "CREATE")]
    Created,
}

/// Validated input for a new partner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartner {
    name: String,
    phone: String,
    email: Option<String>,
}

impl NewPartner {
    /// Validate name and phone; a blank email is dropped
    pub fn new(name: &str, phone: &str, email: Option<&str>) -> Result<Self, BridgeError> {
        Ok(Self {
            name: non_blank("name", name)?.to_owned(),
            phone: non_blank("phone", phone)?.to_owned(),
            email: email
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(ToOwned::to_owned),
        })
    }

    /// Lookup used to detect an existing partner with the same phone
    pub fn existing_lookup(&self) -> PartnerLookup {
        PartnerLookup::Phone(self.phone.clone())
    }

    /// Values for `res.partner.create`
    pub fn values(&self) -> Record {
        let mut values = Record::new();
        values.insert("name".to_owned(), Value::from(self.name.as_str()));
        values.insert("phone".to_owned(), Value::from(self.phone.as_str()));
        if let Some(email) = &self.email {
            values.insert("email".to_owned(), Value::from(email.as_str()));
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use serde_json::json;

    #[test]
    fn id_wins_over_email() {
        let lookup = PartnerLookup::resolve(Some(7), Some("x@y.com"), None).expect("lookup");
        assert_eq!(lookup, PartnerLookup::Id(7));
        let query = lookup.query().expect("query");
        assert_eq!(query.domain.to_value(), json!([["id", "=", 7]]));
        assert_eq!(query.limit, Some(1));
    }

    #[test]
    fn email_wins_over_phone() {
        let lookup =
            PartnerLookup::resolve(None, Some("x@y.com"), Some("+3460000")).expect("lookup");
        assert_eq!(lookup, PartnerLookup::Email("x@y.com".to_owned()));
    }

    #[test]
    fn blank_identifiers_fall_through() {
        let lookup = PartnerLookup::resolve(None, Some("  "), Some("+3460000")).expect("lookup");
        assert_eq!(lookup, PartnerLookup::Phone("+3460000".to_owned()));
    }

    #[test]
    fn no_identifier_is_invalid() {
        let err = PartnerLookup::resolve(None, None, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn new_partner_omits_blank_email() {
        let partner = NewPartner::new("Ana", "+34600", Some("")).expect("valid");
        let values = partner.values();
        assert_eq!(values.get("name"), Some(&json!("Ana")));
        assert!(!values.contains_key("email"));
    }

    #[test]
    fn status_serializes_as_legacy_tokens() {
        assert_eq!(serde_json::to_value(PartnerStatus::Created).expect("json"), json!("CREATE"));
        assert_eq!(serde_json::to_value(PartnerStatus::Already).expect("json"), json!("ALREADY"));
    }
}

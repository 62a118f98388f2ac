// ABOUTME: Connection settings for the Odoo backend loaded from environment or TOML file
// ABOUTME: Validates required endpoint, database, and credentials before the server starts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::fmt;
use std::num::ParseIntError;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::Model;
use crate::types::BridgeError;

/// Default bound on a single backend round-trip (30 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default sale-order field holding the marketplace label
pub const DEFAULT_MARKETPLACE_FIELD: &str = "x_studio_marketplace";

/// Environment variable names read by [`OdooConfig::from_env`]
pub mod env_keys {
    /// Base URL of the Odoo instance (e.g. `https://erp.example.com`)
    pub const URL: &str = "ODOO_URL";
    /// Database name
    pub const DATABASE: &str = "ODOO_DB";
    /// Login of the integration user
    pub const LOGIN: &str = "ODOO_USERNAME";
    /// Password or API key of the integration user
    pub const SECRET: &str = "ODOO_PASSWORD";
    /// Optional per-call timeout in seconds
    pub const TIMEOUT: &str = "ODOO_TIMEOUT_SECS";
    /// Optional custom field used for marketplace lookups
    pub const MARKETPLACE_FIELD: &str = "ODOO_MARKETPLACE_FIELD";
}

/// Settings required to open an authenticated session against Odoo
#[derive(Clone)]
pub struct OdooConfig {
    /// Base URL without trailing slash
    pub url: String,
    /// Database name
    pub database: String,
    /// Login of the integration user
    pub login: String,
    /// Password or API key
    pub secret: String,
    /// Maximum time for a single backend round-trip
    pub timeout: Duration,
    /// Sale-order field used by the marketplace lookup
    pub marketplace_field: String,
}

impl fmt::Debug for OdooConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdooConfig")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("login", &self.login)
            .field("secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("marketplace_field", &self.marketplace_field)
            .finish()
    }
}

/// Partially-specified settings, as read from a file or the environment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSource {
    /// Base URL
    pub url: Option<String>,
    /// Database name
    pub database: Option<String>,
    /// Login
    pub login: Option<String>,
    /// Password or API key
    pub secret: Option<String>,
    /// Timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Marketplace field name
    pub marketplace_field: Option<String>,
}

impl ConfigSource {
    /// Collect settings through an arbitrary key lookup (the process env in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BridgeError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match non_empty(env_keys::TIMEOUT) {
            Some(raw) => Some(
                parse_timeout(&raw)
                    .map_err(|e| {
                        BridgeError::config(format!("{} must be an integer: {e}", env_keys::TIMEOUT))
                    })?
                    .as_secs(),
            ),
            None => None,
        };

        Ok(Self {
            url: non_empty(env_keys::URL),
            database: non_empty(env_keys::DATABASE),
            login: non_empty(env_keys::LOGIN),
            secret: non_empty(env_keys::SECRET),
            timeout_secs,
            marketplace_field: non_empty(env_keys::MARKETPLACE_FIELD),
        })
    }

    /// Overlay `other` on top of `self`; values present in `other` win
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            url: other.url.or(self.url),
            database: other.database.or(self.database),
            login: other.login.or(self.login),
            secret: other.secret.or(self.secret),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            marketplace_field: other.marketplace_field.or(self.marketplace_field),
        }
    }

    /// Validate that every required setting is present and the marketplace
    /// field is one sale orders can be filtered on
    pub fn build(self) -> Result<OdooConfig, BridgeError> {
        let missing: Vec<&str> = [
            (self.url.is_none(), env_keys::URL),
            (self.database.is_none(), env_keys::DATABASE),
            (self.login.is_none(), env_keys::LOGIN),
            (self.secret.is_none(), env_keys::SECRET),
        ]
        .into_iter()
        .filter_map(|(absent, key)| absent.then_some(key))
        .collect();

        let (Some(url), Some(database), Some(login), Some(secret)) =
            (self.url, self.database, self.login, self.secret)
        else {
            return Err(BridgeError::config(format!(
                "Missing required Odoo settings: {}",
                missing.join(", ")
            )));
        };

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BridgeError::config(format!(
                "{} must start with http:// or https://, got {url}",
                env_keys::URL
            )));
        }

        let marketplace_field = self
            .marketplace_field
            .unwrap_or_else(|| DEFAULT_MARKETPLACE_FIELD.to_owned());
        if !Model::SaleOrder.accepts_field(&marketplace_field) {
            return Err(BridgeError::config(format!(
                "{} names '{marketplace_field}', which is not a filterable {} field",
                env_keys::MARKETPLACE_FIELD,
                Model::SaleOrder
            )));
        }

        Ok(OdooConfig {
            url: url.trim_end_matches('/').to_owned(),
            database,
            login,
            secret,
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            marketplace_field,
        })
    }
}

impl OdooConfig {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, BridgeError> {
        ConfigSource::from_lookup(|key| std::env::var(key).ok())?.build()
    }

    /// Load settings from a TOML file, then let the environment override them
    #[cfg(feature = "config-file")]
    pub fn from_file(path: &std::path::Path) -> Result<Self, BridgeError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("Cannot read config file {}: {e}", path.display()))
        })?;
        let file: ConfigSource = toml::from_str(&raw).map_err(|e| {
            BridgeError::config(format!("Invalid config file {}: {e}", path.display()))
        })?;
        let env = ConfigSource::from_lookup(|key| std::env::var(key).ok())?;
        file.merge(env).build()
    }
}

/// Default location of the optional config file (`<config dir>/odoolink/config.toml`)
#[cfg(feature = "config-file")]
pub fn default_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("odoolink").join("config.toml"))
}

/// Parse a timeout value from a string (in seconds)
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a `u64`.
pub fn parse_timeout(input: &str) -> Result<Duration, ParseIntError> {
    input.trim().parse::<u64>().map(Duration::from_secs)
}

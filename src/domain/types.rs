/// Small value types shared by entities and requests
///
/// Recurrence intervals, the post-checkout redirect shape, and the
/// validation helpers that request constructors lean on.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::DomainError;

/// Free-form key/value metadata attached to customers and products
pub type Metadata = BTreeMap<String, String>;

/// Default page size for list operations
pub const DEFAULT_LIST_LIMIT: u32 = 10;

/// Largest page the gateway will return in one call
pub const MAX_LIST_LIMIT: u32 = 100;

/// Billing period for a recurring price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Week,
    Month,
    Year,
}

impl Interval {
    /// Wire representation used by the gateway and the local database
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "day",
            Interval::Week => "week",
            Interval::Month => "month",
            Interval::Year => "year",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Interval::Day),
            "week" => Ok(Interval::Week),
            "month" => Ok(Interval::Month),
            "year" => Ok(Interval::Year),
            other => Err(DomainError::Validation {
                message: format!("Unknown interval '{}'. Valid options: day, week, month, year", other),
            }),
        }
    }
}

/// Recurrence settings nested under a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurring {
    pub interval: Interval,
}

/// What happens after a customer completes checkout through a payment link
///
/// Only redirects are produced by the tools; the gateway's default
/// confirmation page is expressed by leaving the field unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AfterCompletion {
    Redirect { redirect: RedirectTarget },
}

/// Target of a post-checkout redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectTarget {
    pub url: String,
}

impl AfterCompletion {
    /// Build a redirect after validating that the URL is absolute http(s)
    ///
    /// The URL is kept as given so provider placeholders such as
    /// `{CHECKOUT_SESSION_ID}` survive.
    pub fn redirect(url: &str) -> Result<Self, DomainError> {
        let url = url.trim();
        let parsed = Url::parse(url).map_err(|e| DomainError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(AfterCompletion::Redirect {
            redirect: RedirectTarget { url: url.to_string() },
        })
    }
}

/// Reject empty or oversized display names
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName("name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > 250 {
        return Err(DomainError::InvalidName("name too long (max 250 characters)".to_string()));
    }
    Ok(())
}

/// Normalize a currency code to the lowercase form the gateway expects
pub fn normalize_currency(currency: &str) -> Result<String, DomainError> {
    let code = currency.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::InvalidCurrency(currency.to_string()));
    }
    Ok(code.to_ascii_lowercase())
}

/// Resolve an optional page size, applying the default
pub fn resolve_limit(limit: Option<u32>) -> Result<u32, DomainError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit == 0 || limit > MAX_LIST_LIMIT {
        return Err(DomainError::InvalidLimit(limit));
    }
    Ok(limit)
}

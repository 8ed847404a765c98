/// Payment entities as returned by the gateway
///
/// These are deliberately narrow projections of the provider's objects:
/// they deserialize straight from API responses (unknown fields ignored)
/// and serialize into the JSON text that tools hand back to the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Recurring;

/// A customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Creation time as a Unix timestamp
    pub created: i64,
}

/// A product that prices can be attached to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Creation time as a Unix timestamp
    pub created: i64,
}

/// A price for a product, either one-off or recurring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub id: String,
    /// ID of the product this price belongs to
    pub product: String,
    /// Amount in the smallest currency unit (cents for usd)
    ///
    /// The gateway calls this `unit_amount`; it is absent for tiered prices.
    #[serde(alias = "unit_amount")]
    pub amount: Option<i64>,
    pub currency: String,
    /// Recurrence, or null for one-off prices
    pub recurring: Option<Recurring>,
}

/// A shareable checkout link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLink {
    pub id: String,
    pub url: String,
    pub active: bool,
}

/// Convert a gateway timestamp into a UTC datetime, falling back to now
pub fn created_at(created: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(created, 0).unwrap_or_else(Utc::now)
}

/// Storage layer for the local payment catalogue
///
/// This module persists customers, products and prices pulled from the
/// gateway, mapping each external ID to a stable local row.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Customer, Interval, Price, Product};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Product not found locally: {stripe_id}")]
    ProductNotFound { stripe_id: String },

    #[error("Price {stripe_id} has no unit amount")]
    MissingAmount { stripe_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// A customer row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredCustomer {
    pub id: i64,
    pub stripe_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Creation time reported by the gateway
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredProduct {
    pub id: i64,
    pub stripe_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A price row, linked to its product's local row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredPrice {
    pub id: i64,
    pub stripe_id: String,
    pub product_id: i64,
    pub amount: i64,
    pub currency: String,
    pub interval: Option<Interval>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trait defining the storage interface for the synced catalogue
///
/// Upserts are keyed by the external ID and return the local row ID, which
/// stays the same across repeated syncs.
pub trait CatalogStorage {
    fn upsert_customer(&self, customer: &Customer) -> Result<i64, StorageError>;

    fn upsert_product(&self, product: &Product) -> Result<i64, StorageError>;

    /// Fails with `ProductNotFound` when the price's product has no local row
    fn upsert_price(&self, price: &Price) -> Result<i64, StorageError>;

    fn find_product(&self, stripe_id: &str) -> Result<Option<StoredProduct>, StorageError>;

    fn list_customers(&self) -> Result<Vec<StoredCustomer>, StorageError>;

    fn list_products(&self) -> Result<Vec<StoredProduct>, StorageError>;

    fn list_prices(&self) -> Result<Vec<StoredPrice>, StorageError>;
}

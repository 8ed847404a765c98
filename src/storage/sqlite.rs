/// SQLite implementation of the catalogue storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// synced customers, products and prices. It handles all SQL queries and
/// data conversion.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{created_at, Customer, Interval, Price, Product};
use crate::storage::{
    migrations, CatalogStorage, StorageError, StoredCustomer, StoredPrice, StoredProduct,
};

/// SQLite-based storage implementation
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and bring its schema up to date
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    fn row_id(&self, table: &str, stripe_id: &str) -> Result<i64, StorageError> {
        let sql = format!("SELECT id FROM {} WHERE stripe_id = ?1", table);
        Ok(self.conn.query_row(&sql, params![stripe_id], |row| row.get(0))?)
    }
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(idx, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
        })
}

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<StoredCustomer> {
    Ok(StoredCustomer {
        id: row.get(0)?,
        stripe_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        created_at: parse_timestamp(row, 4)?,
        updated_at: parse_timestamp(row, 5)?,
    })
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<StoredProduct> {
    Ok(StoredProduct {
        id: row.get(0)?,
        stripe_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: parse_timestamp(row, 4)?,
        updated_at: parse_timestamp(row, 5)?,
    })
}

fn price_from_row(row: &Row<'_>) -> rusqlite::Result<StoredPrice> {
    let interval: Option<String> = row.get(5)?;
    let interval = interval
        .map(|s| s.parse::<Interval>())
        .transpose()
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(5, "Invalid interval".to_string(), rusqlite::types::Type::Text)
        })?;

    Ok(StoredPrice {
        id: row.get(0)?,
        stripe_id: row.get(1)?,
        product_id: row.get(2)?,
        amount: row.get(3)?,
        currency: row.get(4)?,
        interval,
        created_at: parse_timestamp(row, 6)?,
        updated_at: parse_timestamp(row, 7)?,
    })
}

impl CatalogStorage for SqliteStorage {
    fn upsert_customer(&self, customer: &Customer) -> Result<i64, StorageError> {
        let created = created_at(customer.created).to_rfc3339();
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO stripe_customers (stripe_id, name, email, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (stripe_id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                updated_at = excluded.updated_at",
            params![customer.id, customer.name, customer.email, created, now],
        )?;

        tracing::debug!("Upserted customer {}", customer.id);
        self.row_id("stripe_customers", &customer.id)
    }

    fn upsert_product(&self, product: &Product) -> Result<i64, StorageError> {
        let created = created_at(product.created).to_rfc3339();
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO stripe_products (stripe_id, name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (stripe_id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                updated_at = excluded.updated_at",
            params![product.id, product.name, product.description, created, now],
        )?;

        tracing::debug!("Upserted product {}", product.id);
        self.row_id("stripe_products", &product.id)
    }

    fn upsert_price(&self, price: &Price) -> Result<i64, StorageError> {
        let amount = price.amount.ok_or_else(|| StorageError::MissingAmount {
            stripe_id: price.id.clone(),
        })?;

        let product = self
            .find_product(&price.product)?
            .ok_or_else(|| StorageError::ProductNotFound {
                stripe_id: price.product.clone(),
            })?;

        let interval = price.recurring.map(|r| r.interval.as_str());
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO stripe_prices (
                stripe_id, stripe_product_id, amount, currency, interval, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT (stripe_id) DO UPDATE SET
                stripe_product_id = excluded.stripe_product_id,
                amount = excluded.amount,
                currency = excluded.currency,
                interval = excluded.interval,
                updated_at = excluded.updated_at",
            params![price.id, product.id, amount, price.currency, interval, now],
        )?;

        tracing::debug!("Upserted price {} for product {}", price.id, price.product);
        self.row_id("stripe_prices", &price.id)
    }

    fn find_product(&self, stripe_id: &str) -> Result<Option<StoredProduct>, StorageError> {
        let product = self
            .conn
            .query_row(
                "SELECT id, stripe_id, name, description, created_at, updated_at
                 FROM stripe_products WHERE stripe_id = ?1",
                params![stripe_id],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    fn list_customers(&self) -> Result<Vec<StoredCustomer>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, stripe_id, name, email, created_at, updated_at
             FROM stripe_customers ORDER BY id",
        )?;
        let rows = stmt.query_map([], customer_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn list_products(&self) -> Result<Vec<StoredProduct>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, stripe_id, name, description, created_at, updated_at
             FROM stripe_products ORDER BY id",
        )?;
        let rows = stmt.query_map([], product_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn list_prices(&self) -> Result<Vec<StoredPrice>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, stripe_id, stripe_product_id, amount, currency, interval, created_at, updated_at
             FROM stripe_prices ORDER BY id",
        )?;
        let rows = stmt.query_map([], price_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

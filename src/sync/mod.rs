/// Catalogue sync from the payment gateway into local storage
///
/// Customers and products are pulled first, then prices, so every price can
/// be linked to an already-stored product row. Prices that cannot be linked
/// (unknown product, tiered pricing without a unit amount) are counted and
/// skipped rather than failing the whole run.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{CustomerQuery, DomainError, ListQuery, PriceQuery};
use crate::gateway::{GatewayError, PaymentGateway};
use crate::storage::{CatalogStorage, StorageError};

/// Errors that abort a sync run
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Gateway error during sync: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Storage error during sync: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid sync options: {0}")]
    Options(#[from] DomainError),
}

/// What a sync run stored
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub customers: usize,
    pub products: usize,
    pub prices: usize,
    pub skipped_prices: usize,
}

/// Pull one page of each entity type and upsert it
pub async fn sync_catalog<S: CatalogStorage>(
    gateway: &dyn PaymentGateway,
    storage: &S,
    page_size: u32,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    info!("Syncing customers...");
    let customers = gateway.list_customers(&CustomerQuery::new(Some(page_size), None)?).await?;
    for customer in &customers {
        storage.upsert_customer(customer)?;
        report.customers += 1;
    }

    info!("Syncing products...");
    let products = gateway.list_products(&ListQuery::new(Some(page_size))?).await?;
    for product in &products {
        storage.upsert_product(product)?;
        report.products += 1;
    }

    info!("Syncing prices...");
    let prices = gateway.list_prices(&PriceQuery::new(Some(page_size), None)?).await?;
    for price in &prices {
        match storage.upsert_price(price) {
            Ok(_) => report.prices += 1,
            Err(e @ (StorageError::ProductNotFound { .. } | StorageError::MissingAmount { .. })) => {
                warn!("Skipping price {}: {}", price.id, e);
                report.skipped_prices += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        "Sync complete: {} customers, {} products, {} prices ({} skipped)",
        report.customers, report.products, report.prices, report.skipped_prices
    );
    Ok(report)
}

/// Tools for creating and listing prices
///
/// `stripe_create_price` accepts a flat optional `interval`; the gateway only
/// understands it nested under `recurring`, so the reshaping happens here.

use futures::future::{BoxFuture, FutureExt};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Interval, NewPrice, PriceQuery};
use crate::gateway::PaymentGateway;
use crate::tools::{parse_arguments, Arguments, ToolError};

/// Parameters for creating a price
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePriceArgs {
    /// Product ID
    pub product: String,
    /// Amount in cents
    pub amount: u64,
    /// Currency code (e.g., usd)
    pub currency: String,
    /// Recurring interval
    pub interval: Option<Interval>,
}

/// Parameters for listing prices
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListPricesArgs {
    /// Number of results (1-100, default 10)
    pub limit: Option<u32>,
    /// Only prices for this product ID
    pub product: Option<String>,
}

/// Create a one-off or recurring price for a product
pub fn create_price<'a>(
    gateway: &'a dyn PaymentGateway,
    arguments: Arguments,
) -> BoxFuture<'a, Result<Value, ToolError>> {
    async move {
        let args: CreatePriceArgs = parse_arguments(arguments)?;
        let price = NewPrice::new(args.product, args.amount, &args.currency, args.interval)?;

        let created = gateway.create_price(&price).await?;
        tracing::info!("Created price {} for product {}", created.id, created.product);

        Ok(serde_json::to_value(created)?)
    }
    .boxed()
}

/// List prices, optionally for a single product
pub fn list_prices<'a>(
    gateway: &'a dyn PaymentGateway,
    arguments: Arguments,
) -> BoxFuture<'a, Result<Value, ToolError>> {
    async move {
        let args: ListPricesArgs = parse_arguments(arguments)?;
        let query = PriceQuery::new(args.limit, args.product)?;

        let prices = gateway.list_prices(&query).await?;
        Ok(serde_json::to_value(prices)?)
    }
    .boxed()
}

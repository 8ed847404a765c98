/// Tools for creating and listing products

use futures::future::{BoxFuture, FutureExt};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{ListQuery, NewProduct};
use crate::gateway::PaymentGateway;
use crate::tools::{parse_arguments, Arguments, ToolError};

/// Parameters for creating a product
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateProductArgs {
    /// Product name
    pub name: String,
    /// Product description
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListProductsArgs {
    /// Number of results (1-100, default 10)
    pub limit: Option<u32>,
}

pub fn create_product<'a>(
    gateway: &'a dyn PaymentGateway,
    arguments: Arguments,
) -> BoxFuture<'a, Result<Value, ToolError>> {
    async move {
        let args: CreateProductArgs = parse_arguments(arguments)?;
        let product = NewProduct::new(args.name, args.description)?;

        let created = gateway.create_product(&product).await?;
        tracing::info!("Created product {}", created.id);

        Ok(serde_json::to_value(created)?)
    }
    .boxed()
}

pub fn list_products<'a>(
    gateway: &'a dyn PaymentGateway,
    arguments: Arguments,
) -> BoxFuture<'a, Result<Value, ToolError>> {
    async move {
        let args: ListProductsArgs = parse_arguments(arguments)?;
        let products = gateway.list_products(&ListQuery::new(args.limit)?).await?;
        Ok(serde_json::to_value(products)?)
    }
    .boxed()
}

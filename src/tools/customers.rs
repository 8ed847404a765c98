/// Tools for creating and listing customers
///
/// Implements `stripe_create_customer` and `stripe_list_customers`.

use futures::future::{BoxFuture, FutureExt};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{CustomerQuery, NewCustomer};
use crate::gateway::PaymentGateway;
use crate::tools::{parse_arguments, Arguments, ToolError};

/// Parameters for creating a customer
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCustomerArgs {
    /// Customer name
    pub name: String,
    /// Customer email
    pub email: Option<String>,
    /// Customer description
    pub description: Option<String>,
}

/// Parameters for listing customers
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListCustomersArgs {
    /// Number of results (1-100, default 10)
    pub limit: Option<u32>,
    /// Filter by email
    pub email: Option<String>,
}

/// Create a new customer
pub fn create_customer<'a>(
    gateway: &'a dyn PaymentGateway,
    arguments: Arguments,
) -> BoxFuture<'a, Result<Value, ToolError>> {
    async move {
        let args: CreateCustomerArgs = parse_arguments(arguments)?;
        let customer = NewCustomer::new(args.name, args.email, args.description)?;

        let created = gateway.create_customer(&customer).await?;
        tracing::info!("Created customer {}", created.id);

        Ok(serde_json::to_value(created)?)
    }
    .boxed()
}

/// List customers, optionally filtered by email
pub fn list_customers<'a>(
    gateway: &'a dyn PaymentGateway,
    arguments: Arguments,
) -> BoxFuture<'a, Result<Value, ToolError>> {
    async move {
        let args: ListCustomersArgs = parse_arguments(arguments)?;
        let query = CustomerQuery::new(args.limit, args.email)?;

        let customers = gateway.list_customers(&query).await?;
        Ok(serde_json::to_value(customers)?)
    }
    .boxed()
}

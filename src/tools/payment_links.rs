/// Tool for creating payment links
///
/// A `redirect_url` argument is wrapped into the gateway's
/// `after_completion` redirect object; `quantity` defaults to 1.

use futures::future::{BoxFuture, FutureExt};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::NewPaymentLink;
use crate::gateway::PaymentGateway;
use crate::tools::{parse_arguments, Arguments, ToolError};

/// Parameters for creating a payment link
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePaymentLinkArgs {
    /// Price ID
    pub price: String,
    /// Quantity
    pub quantity: Option<u32>,
    /// Redirect URL after payment
    pub redirect_url: Option<String>,
}

pub fn create_payment_link<'a>(
    gateway: &'a dyn PaymentGateway,
    arguments: Arguments,
) -> BoxFuture<'a, Result<Value, ToolError>> {
    async move {
        let args: CreatePaymentLinkArgs = parse_arguments(arguments)?;
        let link = NewPaymentLink::new(args.price, args.quantity, args.redirect_url.as_deref())?;

        let created = gateway.create_payment_link(&link).await?;
        tracing::info!("Created payment link {}", created.id);

        Ok(serde_json::to_value(created)?)
    }
    .boxed()
}

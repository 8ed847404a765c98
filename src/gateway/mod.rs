/// Payment gateway capability
///
/// The tool layer only ever talks to a `PaymentGateway`. The concrete Stripe
/// client lives in `stripe`; tests substitute their own implementations.

pub mod stripe;

pub use stripe::StripeGateway;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Customer, CustomerQuery, ListQuery, NewCustomer, NewPaymentLink, NewPrice, NewProduct,
    PaymentLink, Price, PriceQuery, Product,
};

/// Errors raised by a payment gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Stripe is not configured: set STRIPE_SECRET or pass --stripe-secret")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stripe API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid gateway response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Create and list operations against a payments provider
///
/// Inputs are the fixed, already-validated request shapes from the domain
/// module. Implementations must be shareable across tasks.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, GatewayError>;

    async fn create_product(&self, product: &NewProduct) -> Result<Product, GatewayError>;

    async fn create_price(&self, price: &NewPrice) -> Result<Price, GatewayError>;

    async fn create_payment_link(&self, link: &NewPaymentLink) -> Result<PaymentLink, GatewayError>;

    async fn list_customers(&self, query: &CustomerQuery) -> Result<Vec<Customer>, GatewayError>;

    async fn list_products(&self, query: &ListQuery) -> Result<Vec<Product>, GatewayError>;

    async fn list_prices(&self, query: &PriceQuery) -> Result<Vec<Price>, GatewayError>;
}

/// Stripe implementation of the payment gateway
///
/// Stripe takes form-encoded bodies with bracket notation for nested
/// fields (`recurring[interval]`, `line_items[0][price]`) and returns JSON.
/// Each create is sent once, with its own freshly generated
/// `Idempotency-Key` header.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::domain::{
    AfterCompletion, Customer, CustomerQuery, ListQuery, NewCustomer, NewPaymentLink, NewPrice,
    NewProduct, PaymentLink, Price, PriceQuery, Product,
};
use crate::gateway::{GatewayError, PaymentGateway};

type Form = Vec<(String, String)>;

/// HTTP client for the Stripe REST API
pub struct StripeGateway {
    client: Client,
    base_url: Url,
    secret_key: Option<String>,
}

/// `{ "data": [...] }` wrapper around list responses
#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl StripeGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("mort-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if config.secret_key.is_none() {
            tracing::warn!("No Stripe secret key configured; tool calls will report an error");
        }

        Ok(Self {
            client,
            base_url: config.api_base.clone(),
            secret_key: config.secret_key.clone(),
        })
    }

    /// Whether a secret key is available
    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    fn secret(&self) -> Result<&str, GatewayError> {
        self.secret_key.as_deref().ok_or(GatewayError::NotConfigured)
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(path)?)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, GatewayError> {
        let secret = self.secret()?;
        let url = self.endpoint(path)?;
        debug!(url = %url, fields = form.len(), "POST request");

        let response = self.create_request(url, secret, &form).send().await?;
        decode(response).await
    }

    fn create_request(&self, url: Url, secret: &str, form: &Form) -> RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(secret)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(form)
    }

    async fn list<T: DeserializeOwned>(&self, path: &str, query: Form) -> Result<Vec<T>, GatewayError> {
        let secret = self.secret()?;
        let url = self.endpoint(path)?;
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(url)
            .bearer_auth(secret)
            .query(&query)
            .send()
            .await?;

        let envelope: ListEnvelope<T> = decode(response).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, GatewayError> {
        self.post("customers", customer_form(customer)).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, GatewayError> {
        self.post("products", product_form(product)).await
    }

    async fn create_price(&self, price: &NewPrice) -> Result<Price, GatewayError> {
        self.post("prices", price_form(price)).await
    }

    async fn create_payment_link(&self, link: &NewPaymentLink) -> Result<PaymentLink, GatewayError> {
        self.post("payment_links", payment_link_form(link)).await
    }

    async fn list_customers(&self, query: &CustomerQuery) -> Result<Vec<Customer>, GatewayError> {
        let mut params = vec![("limit".to_string(), query.limit.to_string())];
        if let Some(email) = &query.email {
            params.push(("email".to_string(), email.clone()));
        }
        self.list("customers", params).await
    }

    async fn list_products(&self, query: &ListQuery) -> Result<Vec<Product>, GatewayError> {
        self.list("products", vec![("limit".to_string(), query.limit.to_string())]).await
    }

    async fn list_prices(&self, query: &PriceQuery) -> Result<Vec<Price>, GatewayError> {
        let mut params = vec![("limit".to_string(), query.limit.to_string())];
        if let Some(product) = &query.product {
            params.push(("product".to_string(), product.clone()));
        }
        self.list("prices", params).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }

    Ok(serde_json::from_str(&body)?)
}

/// Build an API error from a non-2xx response body
fn api_error(status: u16, body: &str) -> GatewayError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => match (error.message, error.kind) {
            (Some(message), _) => message,
            (None, Some(kind)) => kind,
            (None, None) => "unknown error".to_string(),
        },
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    };

    GatewayError::Api { status, message }
}

fn push_metadata(form: &mut Form, metadata: &crate::domain::Metadata) {
    for (key, value) in metadata {
        form.push((format!("metadata[{}]", key), value.clone()));
    }
}

fn customer_form(customer: &NewCustomer) -> Form {
    let mut form = vec![("name".to_string(), customer.name.clone())];
    if let Some(email) = &customer.email {
        form.push(("email".to_string(), email.clone()));
    }
    if let Some(description) = &customer.description {
        form.push(("description".to_string(), description.clone()));
    }
    push_metadata(&mut form, &customer.metadata);
    form
}

fn product_form(product: &NewProduct) -> Form {
    let mut form = vec![("name".to_string(), product.name.clone())];
    if let Some(description) = &product.description {
        form.push(("description".to_string(), description.clone()));
    }
    push_metadata(&mut form, &product.metadata);
    form
}

fn price_form(price: &NewPrice) -> Form {
    let mut form = vec![
        ("product".to_string(), price.product.clone()),
        ("unit_amount".to_string(), price.unit_amount.to_string()),
        ("currency".to_string(), price.currency.clone()),
    ];
    if let Some(recurring) = &price.recurring {
        form.push(("recurring[interval]".to_string(), recurring.interval.to_string()));
    }
    form
}

fn payment_link_form(link: &NewPaymentLink) -> Form {
    let mut form = vec![
        ("line_items[0][price]".to_string(), link.price.clone()),
        ("line_items[0][quantity]".to_string(), link.quantity.to_string()),
    ];
    match &link.after_completion {
        Some(AfterCompletion::Redirect { redirect }) => {
            form.push(("after_completion[type]".to_string(), "redirect".to_string()));
            form.push(("after_completion[redirect][url]".to_string(), redirect.url.clone()));
        }
        None => {}
    }
    form
}

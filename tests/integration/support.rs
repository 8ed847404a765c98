/// Shared helpers: a recording gateway and a line-in/line-out server driver
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mort_mcp::*;
use serde_json::Value;

/// Gateway double that records every call and returns canned entities
#[derive(Default)]
pub struct FakeGateway {
    pub calls: Mutex<Vec<(String, Value)>>,
    pub fail_with: Option<String>,
    pub delay: Option<Duration>,
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub prices: Vec<Price>,
}

impl FakeGateway {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    async fn record<T: serde::Serialize>(&self, op: &str, input: &T) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((op.to_string(), serde_json::to_value(input).unwrap()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.fail_with {
            Some(message) => Err(GatewayError::Api {
                status: 402,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, GatewayError> {
        self.record("create_customer", customer).await?;
        Ok(Customer {
            id: "cus_test".to_string(),
            name: Some(customer.name.clone()),
            email: customer.email.clone(),
            created: 1_700_000_000,
        })
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, GatewayError> {
        self.record("create_product", product).await?;
        Ok(Product {
            id: "prod_test".to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            created: 1_700_000_000,
        })
    }

    async fn create_price(&self, price: &NewPrice) -> Result<Price, GatewayError> {
        self.record("create_price", price).await?;
        Ok(Price {
            id: "price_test".to_string(),
            product: price.product.clone(),
            amount: Some(price.unit_amount as i64),
            currency: price.currency.clone(),
            recurring: price.recurring,
        })
    }

    async fn create_payment_link(&self, link: &NewPaymentLink) -> Result<PaymentLink, GatewayError> {
        self.record("create_payment_link", link).await?;
        Ok(PaymentLink {
            id: "plink_test".to_string(),
            url: "https://buy.stripe.com/test_123".to_string(),
            active: true,
        })
    }

    async fn list_customers(&self, query: &CustomerQuery) -> Result<Vec<Customer>, GatewayError> {
        self.record("list_customers", query).await?;
        Ok(self.customers.clone())
    }

    async fn list_products(&self, query: &ListQuery) -> Result<Vec<Product>, GatewayError> {
        self.record("list_products", query).await?;
        Ok(self.products.clone())
    }

    async fn list_prices(&self, query: &PriceQuery) -> Result<Vec<Price>, GatewayError> {
        self.record("list_prices", query).await?;
        Ok(self.prices.clone())
    }
}

/// Feed `lines` to a fresh server and collect the response lines
pub async fn run_lines(gateway: Arc<FakeGateway>, lines: &[&str]) -> Vec<Value> {
    run_lines_with(gateway, ServerConfig::default(), lines).await
}

pub async fn run_lines_with(gateway: Arc<FakeGateway>, config: ServerConfig, lines: &[&str]) -> Vec<Value> {
    let mut input = lines.join("\n");
    input.push('\n');
    run_bytes(gateway, config, input.as_bytes()).await
}

/// Feed raw bytes to a fresh server, for input that is not valid UTF-8
pub async fn run_bytes(gateway: Arc<FakeGateway>, config: ServerConfig, input: &[u8]) -> Vec<Value> {
    let server = PaymentsServer::with_gateway(gateway, config).expect("server should build");
    let mut mcp = server.into_mcp();
    let mut output: Vec<u8> = Vec::new();

    mcp.serve(input, &mut output).await.expect("serve should finish cleanly");

    String::from_utf8(output)
        .expect("output is UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each output line is one JSON value"))
        .collect()
}

/// Build a `tools/call` request line
pub fn call_line(id: u64, tool: &str, arguments: Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    })
    .to_string()
}

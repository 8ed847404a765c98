/// Fixed request shapes accepted by the payment gateway
///
/// Tools reshape loosely-typed client arguments into these structs. Each
/// constructor validates its input, so a value of one of these types is
/// always safe to send.

use serde::{Deserialize, Serialize};

use crate::domain::{
    normalize_currency, resolve_limit, validate_name, AfterCompletion, DomainError, Interval,
    Metadata, Recurring,
};

/// Parameters for creating a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewCustomer {
    pub fn new(
        name: String,
        email: Option<String>,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        validate_name(&name)?;

        if let Some(email) = &email {
            let email = email.trim();
            if email.is_empty() || !email.contains('@') {
                return Err(DomainError::Validation {
                    message: format!("Invalid email address '{}'", email),
                });
            }
        }

        Ok(Self {
            name: name.trim().to_string(),
            email: email.map(|e| e.trim().to_string()),
            description,
            metadata: Metadata::new(),
        })
    }
}

/// Parameters for creating a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewProduct {
    pub fn new(name: String, description: Option<String>) -> Result<Self, DomainError> {
        validate_name(&name)?;
        Ok(Self {
            name: name.trim().to_string(),
            description,
            metadata: Metadata::new(),
        })
    }
}

/// Parameters for creating a price
///
/// A recurring price carries its interval nested under `recurring`; a
/// one-off price leaves it out entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrice {
    pub product: String,
    pub unit_amount: u64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurring>,
}

impl NewPrice {
    pub fn new(
        product: String,
        unit_amount: u64,
        currency: &str,
        interval: Option<Interval>,
    ) -> Result<Self, DomainError> {
        if product.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Product ID cannot be empty".to_string(),
            });
        }

        Ok(Self {
            product: product.trim().to_string(),
            unit_amount,
            currency: normalize_currency(currency)?,
            recurring: interval.map(|interval| Recurring { interval }),
        })
    }
}

/// Parameters for creating a payment link for a single price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPaymentLink {
    pub price: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_completion: Option<AfterCompletion>,
}

impl NewPaymentLink {
    pub fn new(
        price: String,
        quantity: Option<u32>,
        redirect_url: Option<&str>,
    ) -> Result<Self, DomainError> {
        if price.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Price ID cannot be empty".to_string(),
            });
        }

        let quantity = quantity.unwrap_or(1);
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }

        let after_completion = redirect_url.map(AfterCompletion::redirect).transpose()?;

        Ok(Self {
            price: price.trim().to_string(),
            quantity,
            after_completion,
        })
    }
}

/// Filters for listing customers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerQuery {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CustomerQuery {
    pub fn new(limit: Option<u32>, email: Option<String>) -> Result<Self, DomainError> {
        Ok(Self {
            limit: resolve_limit(limit)?,
            email,
        })
    }
}

/// Page size for listing products
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: u32,
}

impl ListQuery {
    pub fn new(limit: Option<u32>) -> Result<Self, DomainError> {
        Ok(Self {
            limit: resolve_limit(limit)?,
        })
    }
}

/// Filters for listing prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

impl PriceQuery {
    pub fn new(limit: Option<u32>, product: Option<String>) -> Result<Self, DomainError> {
        Ok(Self {
            limit: resolve_limit(limit)?,
            product,
        })
    }
}

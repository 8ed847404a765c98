/// Domain module containing the payment entities and request shapes
///
/// This module defines what the payment gateway returns (customers, products,
/// prices, payment links) and the fixed shapes it accepts when creating or
/// listing them. Validation rules live next to the request types.

pub mod entities;
pub mod requests;
pub mod types;

// Re-export public types for easy access
pub use entities::*;
pub use requests::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur while building gateway requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid currency '{0}': expected a three-letter ISO code")]
    InvalidCurrency(String),

    #[error("Invalid limit {0}: must be between 1 and 100")]
    InvalidLimit(u32),

    #[error("Invalid quantity {0}: must be at least 1")]
    InvalidQuantity(u32),

    #[error("Invalid redirect URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

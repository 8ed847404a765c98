/// MCP tools for payment management
///
/// Each tool turns client-supplied arguments into one of the gateway's fixed
/// request shapes, calls the gateway, and returns the result as JSON. The
/// registry holds the static catalogue and runs the lookup, the required
/// argument check and the success/failure wrapping.

pub mod customers;
pub mod payment_links;
pub mod prices;
pub mod products;
pub mod registry;

pub use customers::*;
pub use payment_links::*;
pub use prices::*;
pub use products::*;
pub use registry::*;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::DomainError;
use crate::gateway::{GatewayError, PaymentGateway};

/// Raw arguments object from a `tools/call` request
pub type Arguments = Map<String, Value>;

/// Signature shared by every tool handler
pub type ToolHandler =
    for<'a> fn(&'a dyn PaymentGateway, Arguments) -> BoxFuture<'a, Result<Value, ToolError>>;

/// Errors that can occur while invoking a tool
///
/// `NotFound`, `MissingArgument` and `InvalidArguments` are caller mistakes
/// and become protocol errors; `Gateway` is a business failure and is
/// reported inside a normal tool result.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Failed to serialize tool output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<DomainError> for ToolError {
    fn from(error: DomainError) -> Self {
        ToolError::InvalidArguments(error.to_string())
    }
}

/// Deserialize an arguments object into a tool's typed argument struct
pub fn parse_arguments<T: DeserializeOwned>(arguments: Arguments) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

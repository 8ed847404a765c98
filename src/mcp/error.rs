/// Protocol-level failures
///
/// Anything that goes wrong while handling a request ends up as one of
/// these, and each carries its JSON-RPC code. Gateway failures during a tool
/// call are not protocol errors and never reach this type.

use std::time::Duration;

use jsonrpc_core::ErrorCode;
use thiserror::Error;

use crate::tools::ToolError;

#[derive(Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request too large: line exceeds {limit} bytes")]
    RequestTooLarge { limit: usize },

    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Tool call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// JSON-RPC error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            McpError::Parse(_) => ErrorCode::ParseError,
            McpError::RequestTooLarge { .. } | McpError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            McpError::MethodNotFound(_) | McpError::ToolNotFound(_) => ErrorCode::MethodNotFound,
            McpError::InvalidParams(_) => ErrorCode::InvalidParams,
            McpError::Timeout(_) | McpError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<ToolError> for McpError {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::NotFound(name) => McpError::ToolNotFound(name),
            e @ (ToolError::MissingArgument(_) | ToolError::InvalidArguments(_)) => {
                McpError::InvalidParams(e.to_string())
            }
            other => McpError::Internal(other.to_string()),
        }
    }
}

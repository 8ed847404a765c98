/// Public library interface for the Mort payments MCP server
///
/// This module exports the server implementation and the public types
/// that can be used by other applications or tests.

use std::sync::Arc;

use thiserror::Error;

// Internal modules
pub mod config;
pub mod domain;
pub mod gateway;
pub mod mcp;
pub mod storage;
pub mod sync;
pub mod tools;

// Re-export public modules and types
pub use config::{Config, GatewayConfig, ServerConfig};
pub use domain::*;
pub use gateway::{GatewayError, PaymentGateway, StripeGateway};
pub use mcp::{McpError, McpServer};
pub use storage::{CatalogStorage, SqliteStorage, StorageError};
pub use sync::{sync_catalog, SyncError, SyncReport};
pub use tools::{RegistryError, ToolError, ToolRegistry};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Tool registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payments server: a gateway plus the tool catalogue in front of it
///
/// Runs the MCP server over stdio, or syncs the gateway's catalogue into a
/// local database.
pub struct PaymentsServer {
    gateway: Arc<dyn PaymentGateway>,
    registry: ToolRegistry,
    config: ServerConfig,
}

impl PaymentsServer {
    /// Create a server backed by the Stripe gateway described in `config`
    pub fn new(config: &Config) -> Result<Self, ServerError> {
        let gateway = StripeGateway::new(&config.gateway)?;
        Self::with_gateway(Arc::new(gateway), config.server)
    }

    /// Create a server around any gateway implementation
    pub fn with_gateway(gateway: Arc<dyn PaymentGateway>, config: ServerConfig) -> Result<Self, ServerError> {
        let registry = ToolRegistry::builtin()?;
        tracing::info!("Registered {} tools", registry.len());

        Ok(Self {
            gateway,
            registry,
            config,
        })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns once stdin reaches end of stream.
    pub async fn run(self) -> Result<(), ServerError> {
        let mut mcp_server = self.into_mcp();
        mcp_server.run().await
    }

    /// Hand the gateway and registry over to an MCP server
    pub fn into_mcp(self) -> McpServer {
        McpServer::new(self.registry, self.gateway, self.config)
    }

    /// Pull the gateway's catalogue into `storage`
    pub async fn sync<S: CatalogStorage>(&self, storage: &S, page_size: u32) -> Result<SyncReport, ServerError> {
        Ok(sync_catalog(self.gateway.as_ref(), storage, page_size).await?)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

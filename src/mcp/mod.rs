/// MCP protocol implementation
///
/// This module handles the Model Context Protocol communication,
/// including JSON-RPC parsing, error codes and tool routing.

pub mod error;
pub mod protocol;
pub mod server;

// Re-export main types
pub use error::McpError;
pub use server::McpServer;

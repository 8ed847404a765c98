/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads newline-delimited JSON-RPC requests from stdin
/// 2. Dispatches them to the initialize / tools handlers
/// 3. Writes one response line per answered request to stdout
///
/// Requests are handled strictly one at a time, so responses leave in the
/// same order their requests arrived.

use std::io;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::gateway::PaymentGateway;
use crate::mcp::protocol::*;
use crate::mcp::McpError;
use crate::tools::ToolRegistry;
use crate::ServerError;

/// MCP server that handles communication with the client
pub struct McpServer {
    registry: ToolRegistry,
    gateway: Arc<dyn PaymentGateway>,
    config: ServerConfig,
    /// Whether the client has sent `notifications/initialized`
    initialized: bool,
}

/// Outcome of reading one line from the input
#[derive(Debug, PartialEq)]
enum LineRead {
    Line,
    TooLong,
    Eof,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, gateway: Arc<dyn PaymentGateway>, config: ServerConfig) -> Self {
        Self {
            registry,
            gateway,
            config,
            initialized: false,
        }
    }

    /// Run the MCP server over the process's stdin and stdout
    ///
    /// Stdout is used unbuffered; every response is flushed as soon as it is
    /// written.
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve requests from `reader` until end of stream
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            match read_bounded_line(&mut reader, &mut buf, self.config.max_line_bytes).await {
                Ok(LineRead::Eof) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(LineRead::TooLong) => {
                    let err = McpError::RequestTooLarge {
                        limit: self.config.max_line_bytes,
                    };
                    warn!("{}", err);
                    write_response(&mut writer, &JsonRpcResponse::from_error(Value::Null, &err)).await?;
                }
                Ok(LineRead::Line) => {
                    let response = match std::str::from_utf8(&buf) {
                        Ok(line) => self.process_line(line).await,
                        Err(e) => Some(JsonRpcResponse::from_error(
                            Value::Null,
                            &McpError::Parse(format!("invalid UTF-8: {}", e)),
                        )),
                    };

                    if let Some(response) = response {
                        write_response(&mut writer, &response).await?;
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns the response to send, if any. Blank lines, messages without
    /// the `"2.0"` marker, notifications and id-less requests produce none.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::from_error(Value::Null, &McpError::Parse(e.to_string())));
            }
        };

        self.handle_message(value).await
    }

    /// Handle one decoded JSON message
    pub async fn handle_message(&mut self, message: Value) -> Option<JsonRpcResponse> {
        if message.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            debug!("Ignoring message without a jsonrpc 2.0 marker");
            return None;
        }

        let raw_id = message.get("id").filter(|id| !id.is_null()).cloned();

        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                let err = McpError::InvalidRequest(e.to_string());
                warn!("{}", err);
                return raw_id.map(|id| JsonRpcResponse::from_error(id, &err));
            }
        };

        let params = request.params.unwrap_or_else(|| Value::Object(Map::new()));
        let outcome = self.dispatch(&request.method, params).await;

        if request.method == methods::INITIALIZED {
            return None;
        }

        let id = match request.id {
            Some(id) => id,
            None => {
                if let Err(e) = &outcome {
                    debug!("Dropping error for id-less request: {}", e);
                }
                return None;
            }
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!("Request {} failed: {}", request.method, e);
                JsonRpcResponse::from_error(id, &e)
            }
        })
    }

    /// Route a request to its handler
    async fn dispatch(&mut self, method: &str, params: Value) -> Result<Value, McpError> {
        match method {
            methods::INITIALIZE => self.handle_initialize(),
            methods::INITIALIZED => {
                self.initialized = true;
                debug!("Client finished initialization");
                Ok(Value::Null)
            }
            methods::TOOLS_LIST => self.handle_tools_list(),
            methods::TOOLS_CALL => self.handle_tools_call(params).await,
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&self) -> Result<Value, McpError> {
        info!("MCP client connected");
        to_result(InitializeResult::current())
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Result<Value, McpError> {
        let tools = self.registry.definitions();
        Ok(serde_json::json!({ "tools": to_result(tools)? }))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let params: ToolCallParams =
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        if !self.initialized {
            debug!("tools/call received before notifications/initialized");
        }

        let arguments = params.arguments.unwrap_or_default();
        let timeout = self.config.call_timeout;
        let call = self.registry.call(self.gateway.as_ref(), &params.name, arguments);

        let result = tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| McpError::Timeout(timeout))??;

        to_result(result)
    }
}

fn to_result<T: serde::Serialize>(value: T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::Internal(e.to_string()))
}

/// Write one response as a single line and flush it
async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');

    writer.write_all(&line).await?;
    writer.flush().await?;

    debug!("Sent response: {}", String::from_utf8_lossy(&line[..line.len() - 1]));
    Ok(())
}

/// Read one `\n`-terminated line into `buf`, holding at most `limit` bytes
///
/// An over-long line is consumed up to its newline without being buffered.
/// A final line without a trailing newline still counts as a line.
async fn read_bounded_line<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let mut too_long = false;

    loop {
        let (used, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(if too_long {
                    LineRead::TooLong
                } else if buf.is_empty() {
                    LineRead::Eof
                } else {
                    LineRead::Line
                });
            }

            let (content, used, done) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (&available[..i], i + 1, true),
                None => (available, available.len(), false),
            };

            if !too_long {
                if buf.len() + content.len() > limit {
                    too_long = true;
                    buf.clear();
                } else {
                    buf.extend_from_slice(content);
                }
            }

            (used, done)
        };

        reader.consume(used);

        if done {
            return Ok(if too_long { LineRead::TooLong } else { LineRead::Line });
        }
    }
}

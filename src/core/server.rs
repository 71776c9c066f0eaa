//! MCP Server - the message dispatcher.
//!
//! `McpServer` routes one decoded request at a time to a handler and builds
//! the response envelope. It holds no per-connection state, so a single
//! instance is cloned into every connection handler.
//!
//! | method        | result                                         |
//! |---------------|------------------------------------------------|
//! | `initialize`  | fixed protocol version, capabilities, identity |
//! | `tools/list`  | registered tools in registration order         |
//! | `tools/call`  | tool outcome, or `-32601` for unknown tools    |
//! | missing       | `-32600`                                       |
//! | anything else | `-32601`                                       |
//!
//! Decode failures get `-32700` with a `null` id; a fault while building a
//! response gets `-32603` with the request id.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};

use super::config::Config;
use super::error::Result;
use super::protocol::{
    DecodeError, ErrorObject, MessageCodec, PROTOCOL_VERSION, Request, Response,
};
use crate::domains::scoring;
use crate::domains::tools::{ToolInvoker, ToolRegistry};

/// Last-resort reply when even an internal-error envelope cannot be encoded.
const FALLBACK_INTERNAL_ERROR: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

/// Server identity reported by `initialize`.
#[derive(Debug, Clone)]
struct ServerIdentity {
    name: String,
    version: String,
}

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    identity: Arc<ServerIdentity>,

    /// Read-only after startup; shared by every connection.
    registry: Arc<ToolRegistry>,

    invoker: ToolInvoker,
}

impl McpServer {
    /// Create a server around an already-populated registry.
    pub fn new(config: &Config, registry: ToolRegistry) -> Self {
        Self {
            identity: Arc::new(ServerIdentity {
                name: config.server.name.clone(),
                version: config.server.version.clone(),
            }),
            registry: Arc::new(registry),
            invoker: ToolInvoker::new(config.tools.timeout()),
        }
    }

    /// Validate the configuration, load the score model and register the
    /// built-in tools.
    pub fn bootstrap(config: &Config) -> Result<Self> {
        config.validate()?;
        let predictor = scoring::load_predictor(&config.model);
        let registry = ToolRegistry::with_builtin_tools(predictor)?;
        info!("Registered {} tools", registry.len());
        let server = Self::new(config, registry);
        match server.invoker.timeout() {
            Some(limit) => info!("Tool calls time out after {:?}", limit),
            None => info!("Tool calls run without a time limit"),
        }
        Ok(server)
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.identity.version
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    // ========================================================================
    // Wire entry points
    // ========================================================================

    /// Handle one text frame and produce the reply frame.
    pub async fn handle_message(&self, text: &str) -> String {
        debug!("Raw message: {}", text);
        self.reply(MessageCodec::decode(text)).await
    }

    /// Handle one binary frame (UTF-8 JSON) and produce the reply frame.
    pub async fn handle_bytes(&self, bytes: &[u8]) -> String {
        self.reply(MessageCodec::decode_bytes(bytes)).await
    }

    async fn reply(&self, decoded: std::result::Result<Request, DecodeError>) -> String {
        let response = match decoded {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                warn!("Invalid JSON received: {}", e);
                Response::error(Value::Null, ErrorObject::parse_error(e.to_string()))
            }
        };
        encode(response)
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Route a decoded request. Never fails: every problem becomes an error
    /// envelope carrying the request's id.
    pub async fn dispatch(&self, request: Request) -> Response {
        let id = request.id.clone();
        match AssertUnwindSafe(self.route(&request)).catch_unwind().await {
            Ok(Ok(result)) => Response::success(id, result),
            Ok(Err(error)) => Response::error(id, error),
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "dispatcher panicked".to_string());
                error!("Error handling message: {}", detail);
                Response::error(id, ErrorObject::internal_error(detail))
            }
        }
    }

    #[instrument(skip_all, fields(id = %request.id))]
    async fn route(&self, request: &Request) -> std::result::Result<Value, ErrorObject> {
        let method = match &request.method {
            None => {
                warn!("Missing method in request");
                return Err(ErrorObject::invalid_request("missing method"));
            }
            Some(Value::String(method)) => method.as_str(),
            Some(other) => {
                warn!("Method not found: {}", other);
                return Err(ErrorObject::method_not_found(&other.to_string()));
            }
        };

        info!("Processing method: {}", method);

        match method {
            "initialize" => Ok(self.initialize_result()),
            "tools/list" => Ok(self.tools_list_result()),
            "tools/call" => self.call_tool(request.params.as_ref()).await,
            other => {
                warn!("Method not found: {}", other);
                Err(ErrorObject::method_not_found(other))
            }
        }
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.name(),
                "version": self.version()
            }
        })
    }

    fn tools_list_result(&self) -> Value {
        let tools: Vec<Value> = self.registry.list().map(|t| t.descriptor()).collect();
        debug!("Returning {} tools", tools.len());
        json!({ "tools": tools })
    }

    async fn call_tool(&self, params: Option<&Value>) -> std::result::Result<Value, ErrorObject> {
        // Anything but an object carries no tool name.
        let params = params.and_then(Value::as_object);

        let name = match params.and_then(|p| p.get("name")) {
            Some(Value::String(name)) => name.as_str(),
            other => {
                let shown = other.cloned().unwrap_or(Value::Null).to_string();
                warn!("Tool not found: {}", shown);
                return Err(ErrorObject::tool_not_found(&shown));
            }
        };

        let Some(tool) = self.registry.lookup(name) else {
            warn!("Tool not found: {}", name);
            return Err(ErrorObject::tool_not_found(name));
        };

        let arguments = params.and_then(|p| p.get("arguments")).cloned();
        info!("Calling tool '{}'", name);

        let outcome = self.invoker.invoke(tool, arguments).await;
        Ok(outcome.into_call_result())
    }
}

/// Encode a response, degrading to an internal-error envelope on failure.
fn encode(response: Response) -> String {
    match MessageCodec::encode(&response) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to encode response: {}", e);
            let fallback = Response::error(response.id, ErrorObject::internal_error(e.to_string()));
            MessageCodec::encode(&fallback).unwrap_or_else(|_| FALLBACK_INTERNAL_ERROR.to_string())
        }
    }
}

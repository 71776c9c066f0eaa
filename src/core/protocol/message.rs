//! Request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version tag carried on every response.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// The complete set of protocol error codes this server emits.
pub mod error_codes {
    /// The frame was not a JSON object.
    pub const PARSE_ERROR: i32 = -32700;
    /// The envelope was an object but not a usable request.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Unknown method, or `tools/call` on an unregistered tool.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Unexpected fault while building a response.
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// A decoded request envelope.
///
/// Fields are kept as raw JSON so that shape problems (missing or non-string
/// `method`, non-object `params`) are reported by the dispatcher with the
/// request's `id` intact rather than collapsing into a parse error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Request {
    /// Opaque request id; `Null` when absent.
    #[serde(default)]
    pub id: Value,

    /// The method name, if the key was present at all.
    #[serde(default, deserialize_with = "present")]
    pub method: Option<Value>,

    /// Method parameters; absent is treated as an empty mapping.
    #[serde(default)]
    pub params: Option<Value>,
}

/// Distinguish `"method": null` from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Request {
    /// Build a request for `method` with the given id and params.
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            id: id.into(),
            method: Some(Value::String(method.into())),
            params: Some(params),
        }
    }
}

/// Error member of an error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach diagnostic data.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Malformed frame; `detail` is the decoder's message.
    pub fn parse_error(detail: impl Into<String>) -> Self {
        Self::new(error_codes::PARSE_ERROR, "Parse error").with_data(detail.into())
    }

    /// The envelope is not a usable request.
    pub fn invalid_request(reason: &str) -> Self {
        Self::new(
            error_codes::INVALID_REQUEST,
            format!("Invalid request: {reason}"),
        )
    }

    /// No handler for the requested method.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )
    }

    /// `tools/call` named a tool that is not registered.
    pub fn tool_not_found(name: &str) -> Self {
        Self::new(error_codes::METHOD_NOT_FOUND, format!("Tool not found: {name}"))
    }

    /// Unexpected fault while building a response.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, "Internal error").with_data(detail.into())
    }
}

/// Exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Result(Value),
    Error(ErrorObject),
}

/// A response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Response {
    /// Success envelope.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            payload: Payload::Result(result),
        }
    }

    /// Error envelope.
    pub fn error(id: Value, error: ErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            payload: Payload::Error(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, Payload::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Result(value) => Some(value),
            Payload::Error(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&ErrorObject> {
        match &self.payload {
            Payload::Error(error) => Some(error),
            Payload::Result(_) => None,
        }
    }
}

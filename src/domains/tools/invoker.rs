//! Tool invocation and failure isolation.
//!
//! The invoker binds the caller's arguments against the tool's schema, runs
//! the handler to completion and folds every failure (bad arguments, an
//! `Err` from the body, a panic, an optional timeout) into a
//! [`ToolOutcome::Failure`]. Nothing that happens inside a tool turns into a
//! protocol error, and a failing call is never retried.

use std::any::Any;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::task::JoinError;
use tracing::{debug, warn};

use super::error::ToolError;
use super::schema::InputSchema;
use super::tool::{Arguments, Handler, Tool, ToolResult};

/// What a tool call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// The handler returned a value.
    Success(Value),
    /// The handler failed; the text is shown to the client.
    Failure(String),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The `text` carried in the content block.
    ///
    /// JSON objects are pretty-printed, strings are sent as-is and every other
    /// value uses its compact JSON form.
    pub fn text(&self) -> String {
        match self {
            Self::Success(Value::String(s)) => s.clone(),
            Self::Success(value @ Value::Object(_)) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Success(value) => value.to_string(),
            Self::Failure(message) => message.clone(),
        }
    }

    /// The `tools/call` result payload.
    pub fn into_call_result(self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text() }],
            "isError": self.is_error(),
        })
    }
}

/// Runs tools on behalf of the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct ToolInvoker {
    timeout: Option<Duration>,
}

impl ToolInvoker {
    /// Create an invoker. With a timeout, a call that does not finish in
    /// time is reported as a failure; the handler itself keeps running.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Invoke `tool` with the raw `arguments` member of a `tools/call`.
    pub async fn invoke(&self, tool: &Tool, arguments: Option<Value>) -> ToolOutcome {
        let result = match bind_arguments(tool.schema(), arguments) {
            Ok(bound) => self.run(tool, bound).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => {
                debug!("Tool {} completed successfully", tool.name());
                ToolOutcome::Success(value)
            }
            Err(e) => {
                warn!("Tool {} failed: {}", tool.name(), e);
                ToolOutcome::Failure(format!("Tool execution failed: {e}"))
            }
        }
    }

    async fn run(&self, tool: &Tool, arguments: Arguments) -> ToolResult {
        // Both shapes run on their own task: a panic stays inside the task,
        // and a timed-out call is detached rather than dropped.
        let handle = match tool.handler() {
            Handler::Blocking(f) => {
                let f = f.clone();
                tokio::task::spawn_blocking(move || f(arguments))
            }
            Handler::Async(h) => {
                let h = h.clone();
                tokio::spawn(async move { h.execute(arguments).await })
            }
        };

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => return Err(ToolError::Timeout(limit)),
            },
            None => handle.await,
        };

        joined.map_err(join_failure)?
    }
}

/// Bind call arguments with keyword-call semantics.
///
/// Absent optional parameters receive their declared default; a missing
/// required parameter or an undeclared argument is rejected.
pub fn bind_arguments(schema: &InputSchema, arguments: Option<Value>) -> Result<Arguments, ToolError> {
    let mut bound = match arguments {
        None | Some(Value::Null) => Arguments::new(),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(ToolError::invalid_arguments(
                "arguments must be a JSON object",
            ));
        }
    };

    if let Some(unexpected) = bound.keys().find(|key| schema.get(key).is_none()) {
        return Err(ToolError::invalid_arguments(format!(
            "unexpected argument '{unexpected}'"
        )));
    }

    let mut missing = Vec::new();
    for param in schema.params() {
        if bound.contains_key(&param.name) {
            continue;
        }
        match &param.default {
            Some(default) => {
                bound.insert(param.name.clone(), default.clone());
            }
            None => missing.push(param.name.as_str()),
        }
    }

    if !missing.is_empty() {
        return Err(ToolError::invalid_arguments(format!(
            "missing required argument(s): {}",
            missing.join(", ")
        )));
    }

    Ok(bound)
}

fn join_failure(err: JoinError) -> ToolError {
    if err.is_panic() {
        ToolError::Panicked(panic_message(err.into_panic()))
    } else {
        ToolError::internal(err.to_string())
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

//! Tool definitions as seen by the registry and the invoker.
//!
//! A [`Tool`] bundles a unique name, a description, a derived
//! [`InputSchema`] and a [`Handler`]. Handlers come in two shapes:
//!
//! - **Blocking**: a plain function, run on the blocking thread pool so that
//!   CPU-bound work never stalls other connections.
//! - **Async**: a [`ToolHandler`] that may suspend on I/O before completing.
//!
//! Both are awaited to completion by the invoker before a response is built.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use super::error::ToolError;
use super::schema::{InputSchema, Param};

/// Bound argument mapping handed to a handler.
pub type Arguments = Map<String, Value>;

/// Result of a handler body.
pub type ToolResult = Result<Value, ToolError>;

/// Trait for tools whose handler may suspend before completing.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with already-bound arguments.
    async fn execute(&self, arguments: Arguments) -> ToolResult;
}

type BlockingFn = dyn Fn(Arguments) -> ToolResult + Send + Sync;

/// The execution shape of a tool.
#[derive(Clone)]
pub enum Handler {
    Blocking(Arc<BlockingFn>),
    Async(Arc<dyn ToolHandler>),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocking(_) => f.write_str("Handler::Blocking"),
            Self::Async(_) => f.write_str("Handler::Async"),
        }
    }
}

/// Adapts an async closure to [`ToolHandler`].
struct AsyncFnHandler<F>(F);

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for AsyncFnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = ToolResult> + Send + 'static,
{
    async fn execute(&self, arguments: Arguments) -> ToolResult {
        (self.0)(arguments).await
    }
}

/// A registered, remotely callable operation.
#[derive(Debug, Clone)]
pub struct Tool {
    name: String,
    description: String,
    schema: InputSchema,
    handler: Handler,
}

impl Tool {
    fn with_handler(
        name: impl Into<String>,
        description: impl Into<String>,
        params: impl IntoIterator<Item = Param>,
        handler: Handler,
    ) -> Self {
        let name = name.into();
        let mut description = description.into();
        if description.trim().is_empty() {
            description = format!("Tool: {name}");
        }
        Self {
            name,
            description,
            schema: InputSchema::derive(params),
            handler,
        }
    }

    /// A tool whose handler completes synchronously.
    pub fn blocking<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        params: impl IntoIterator<Item = Param>,
        handler: F,
    ) -> Self
    where
        F: Fn(Arguments) -> ToolResult + Send + Sync + 'static,
    {
        Self::with_handler(name, description, params, Handler::Blocking(Arc::new(handler)))
    }

    /// A tool backed by a [`ToolHandler`] implementation.
    pub fn asynchronous<H>(
        name: impl Into<String>,
        description: impl Into<String>,
        params: impl IntoIterator<Item = Param>,
        handler: H,
    ) -> Self
    where
        H: ToolHandler + 'static,
    {
        Self::with_handler(name, description, params, Handler::Async(Arc::new(handler)))
    }

    /// A tool backed by an async closure.
    pub fn from_async_fn<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        params: impl IntoIterator<Item = Param>,
        handler: F,
    ) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        Self::asynchronous(name, description, params, AsyncFnHandler(handler))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &InputSchema {
        &self.schema
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// The `tools/list` descriptor for this tool.
    pub fn descriptor(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.schema.to_json(),
        })
    }
}

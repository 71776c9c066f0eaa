//! Tool-specific error types.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while registering or running a tool.
///
/// Registration errors surface at startup. Every other variant is caught by
/// the [`ToolInvoker`](super::ToolInvoker) and reported to the client as a
/// tool-level failure inside a successful envelope.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool body reported a failure.
    #[error("{0}")]
    ExecutionFailed(String),

    /// The tool did not finish within the configured bound.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The tool body panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "already registered" error.
    pub fn already_registered(name: impl Into<String>) -> Self {
        Self::AlreadyRegistered(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

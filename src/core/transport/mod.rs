//! Transport layer for the MCP server.
//!
//! - **WebSocket**: one JSON-RPC message per frame, many concurrent
//!   connections, keepalive pings (default) - feature: `websocket`
//! - **STDIO**: one connection over stdin/stdout, one message per line -
//!   feature: `stdio`
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the MCP server handler.

mod config;
mod error;
mod service;

#[cfg(feature = "websocket")]
mod session;

#[cfg(feature = "websocket")]
pub mod websocket;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "websocket")]
pub use config::{KeepaliveConfig, WebSocketConfig};

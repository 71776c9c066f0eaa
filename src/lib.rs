//! Score MCP Server Library
//!
//! A Model Context Protocol (MCP) tool server: clients connect over a
//! WebSocket (or stdin/stdout), discover the registered tools with
//! `tools/list` and run them with `tools/call`.
//!
//! # Architecture
//!
//! - **core**: wire format, configuration, error handling, the dispatcher
//!   and the transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool registry, schemas, invocation and the built-in tools
//!   - **scoring**: the game score model behind `predict_score`
//!
//! # Example
//!
//! ```rust,no_run
//! use score_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::bootstrap(&config)?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};

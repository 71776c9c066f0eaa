//! Tools domain module.
//!
//! This module handles everything about tools: remotely callable operations
//! with a declared parameter schema.
//!
//! ## Architecture
//!
//! - `schema.rs` - Static parameter declarations and schema derivation
//! - `tool.rs` - The `Tool` type and its two handler shapes
//! - `registry.rs` - Name-keyed, insertion-ordered tool registry
//! - `invoker.rs` - Argument binding, execution and failure isolation
//! - `error.rs` - Tool-specific error types
//! - `definitions/` - Built-in tool implementations (one file per tool)
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define `NAME`, `DESCRIPTION`, parameters and `to_tool()`
//! 3. Add it to `builtin_tools()` in `definitions/mod.rs`

pub mod definitions;
mod error;
mod invoker;
mod registry;
mod schema;
mod tool;

pub use error::ToolError;
pub use invoker::{ToolInvoker, ToolOutcome, bind_arguments};
pub use registry::ToolRegistry;
pub use schema::{InputSchema, Param, ParamSchema, ParamType};
pub use tool::{Arguments, Handler, Tool, ToolHandler, ToolResult};

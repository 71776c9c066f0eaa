//! Tool Registry - the set of callable tools.
//!
//! The registry is filled once during startup and then shared read-only
//! (behind an `Arc`) with every connection handler, so lookups need no
//! locking. Enumeration order is registration order.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::definitions;
use super::error::ToolError;
use super::tool::Tool;
use crate::domains::scoring::ScorePredictor;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - name-keyed, insertion-ordered.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in tools.
    pub fn with_builtin_tools(
        predictor: Option<Arc<dyn ScorePredictor>>,
    ) -> Result<Self, ToolError> {
        let mut registry = Self::new();
        for tool in definitions::builtin_tools(predictor) {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool. Fails if the name is already taken.
    pub fn register(&mut self, tool: Tool) -> Result<(), ToolError> {
        if self.index.contains_key(tool.name()) {
            return Err(ToolError::already_registered(tool.name()));
        }
        debug!("Registering tool: {}", tool.name());
        self.index.insert(tool.name().to_string(), self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn lookup(&self, name: &str) -> Option<&Tool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Iterate tools in registration order.
    ///
    /// Each call starts a fresh pass over the same sequence.
    pub fn list(&self) -> impl Iterator<Item = &Tool> + '_ {
        self.tools.iter()
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.list().map(Tool::name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

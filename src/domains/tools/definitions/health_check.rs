//! Health check tool.

use serde_json::{Value, json};

use crate::domains::tools::Tool;

/// Health check tool implementation.
#[derive(Debug, Clone, Copy)]
pub struct HealthCheckTool {
    model_available: bool,
}

impl HealthCheckTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "health_check";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Check if the server and prediction model are working";

    pub fn new(model_available: bool) -> Self {
        Self { model_available }
    }

    pub fn execute(&self) -> Value {
        let message = if self.model_available {
            "Server is running normally"
        } else {
            "Server running but prediction model unavailable"
        };
        json!({
            "server_status": "healthy",
            "model_available": self.model_available,
            "prediction_function": self.model_available,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn to_tool(self) -> Tool {
        Tool::blocking(Self::NAME, Self::DESCRIPTION, [], move |_| Ok(self.execute()))
    }
}

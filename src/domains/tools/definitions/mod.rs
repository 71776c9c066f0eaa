//! Tool definitions module.
//!
//! This module exports all built-in tool definitions, one file per tool.
//! Each tool exposes its `NAME`, `DESCRIPTION`, parameter declarations and a
//! `to_tool()` constructor producing the registry entry.

mod health_check;
mod predict_score;
mod sample_data;

use std::sync::Arc;

pub use health_check::HealthCheckTool;
pub use predict_score::{PredictScoreParams, PredictScoreTool};
pub use sample_data::SampleDataTool;

use super::tool::Tool;
use crate::domains::scoring::ScorePredictor;

/// All built-in tools, in the order `tools/list` reports them.
pub fn builtin_tools(predictor: Option<Arc<dyn ScorePredictor>>) -> Vec<Tool> {
    let model_available = predictor.is_some();
    vec![
        PredictScoreTool::new(predictor).to_tool(),
        SampleDataTool::to_tool(),
        HealthCheckTool::new(model_available).to_tool(),
    ]
}

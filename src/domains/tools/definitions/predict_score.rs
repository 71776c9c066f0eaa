//! Game score prediction tool.
//!
//! Thin adapter between the `tools/call` arguments and a [`ScorePredictor`].
//! Model problems are reported inside the returned payload (`error` key), so
//! the client always gets the echoed input parameters back.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domains::scoring::{GameFeatures, ScorePredictor};
use crate::domains::tools::{Arguments, Param, ParamType, Tool, ToolError};

/// Parameters for a prediction. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictScoreParams {
    pub price: Option<f64>,
    pub release_month: Option<u32>,
    pub tags: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
}

impl PredictScoreParams {
    /// Parse bound call arguments.
    pub fn from_arguments(arguments: Arguments) -> Result<Self, ToolError> {
        serde_json::from_value(Value::Object(arguments))
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))
    }

    pub fn into_features(self) -> GameFeatures {
        GameFeatures {
            price: self.price,
            release_month: self.release_month,
            tags: self.tags.unwrap_or_default(),
            genres: self.genres.unwrap_or_default(),
            platforms: self.platforms.unwrap_or_default(),
        }
    }
}

/// Score prediction tool implementation.
#[derive(Clone)]
pub struct PredictScoreTool {
    predictor: Option<Arc<dyn ScorePredictor>>,
}

impl PredictScoreTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "predict_score";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Predict a game's score (0-100) from its price, release month, tags, genres and platforms. All parameters are optional. Returns the predicted score together with the input parameters used.";

    pub fn new(predictor: Option<Arc<dyn ScorePredictor>>) -> Self {
        Self { predictor }
    }

    /// Declared parameters.
    pub fn params() -> Vec<Param> {
        vec![
            Param::new("price")
                .typed(ParamType::Number)
                .optional()
                .describe("Game price in dollars"),
            Param::new("release_month")
                .typed(ParamType::Integer)
                .optional()
                .describe("Month of release (1-12)"),
            Param::new("tags")
                .typed(ParamType::Array)
                .optional()
                .describe("List of game tags"),
            Param::new("genres")
                .typed(ParamType::Array)
                .optional()
                .describe("List of game genres"),
            Param::new("platforms")
                .typed(ParamType::Array)
                .optional()
                .describe("List of platforms"),
        ]
    }

    /// Execute the tool logic.
    pub fn execute(&self, features: &GameFeatures) -> Value {
        let input_parameters = json!({
            "price": features.price,
            "release_month": features.release_month,
            "tags": features.tags,
            "genres": features.genres,
            "platforms": features.platforms,
        });

        let Some(predictor) = &self.predictor else {
            return json!({
                "error": "Prediction model not available",
                "predicted_score": null,
                "input_parameters": input_parameters,
            });
        };

        match predictor.predict(features) {
            Ok(score) => {
                let score = (score * 100.0).round() / 100.0;
                info!("Predicted score {} for {:?}", score, features);
                json!({
                    "predicted_score": score,
                    "input_parameters": input_parameters,
                })
            }
            Err(e) => json!({
                "error": format!("Prediction failed: {e}"),
                "predicted_score": null,
                "input_parameters": input_parameters,
            }),
        }
    }

    /// Create the registry entry for this tool.
    pub fn to_tool(self) -> Tool {
        Tool::blocking(Self::NAME, Self::DESCRIPTION, Self::params(), move |args| {
            let features = PredictScoreParams::from_arguments(args)?.into_features();
            Ok(self.execute(&features))
        })
    }
}

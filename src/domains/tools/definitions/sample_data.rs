//! Sample data tool: canned inputs for trying out predictions.

use serde_json::{Value, json};

use crate::domains::tools::Tool;

/// Sample data tool implementation.
#[derive(Debug, Clone, Copy)]
pub struct SampleDataTool;

impl SampleDataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_sample_data";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get sample data for testing predictions";

    pub fn execute() -> Value {
        json!({
            "sample_tags": ["Action", "Adventure", "RPG", "Shooter", "Strategy", "Indie", "Simulation", "Sports"],
            "sample_genres": ["Action", "Adventure", "RPG", "Simulation", "Strategy", "Sports", "Racing"],
            "sample_platforms": ["PC", "PlayStation", "Xbox", "Nintendo Switch", "Mobile"],
            "example_predictions": [
                {
                    "description": "Indie action game",
                    "price": 19.99,
                    "release_month": 3,
                    "tags": ["Action", "Adventure", "Indie"],
                    "genres": ["Action"],
                    "platforms": ["PC", "PlayStation"]
                },
                {
                    "description": "AAA RPG",
                    "price": 59.99,
                    "release_month": 11,
                    "tags": ["RPG", "Adventure", "Open World"],
                    "genres": ["RPG", "Adventure"],
                    "platforms": ["PC", "PlayStation", "Xbox"]
                },
                {
                    "description": "Free mobile game",
                    "price": 0.0,
                    "release_month": 6,
                    "tags": ["Casual", "Mobile"],
                    "genres": ["Casual"],
                    "platforms": ["Mobile"]
                }
            ]
        })
    }

    pub fn to_tool() -> Tool {
        Tool::blocking(Self::NAME, Self::DESCRIPTION, [], |_| Ok(Self::execute()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_examples() {
        let data = SampleDataTool::execute();
        assert_eq!(data["example_predictions"].as_array().map(Vec::len), Some(3));
        assert!(SampleDataTool::to_tool().schema().params().is_empty());
    }
}

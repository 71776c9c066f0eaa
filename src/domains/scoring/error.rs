//! Score model error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or evaluating a score model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The weights file could not be read.
    #[error("Cannot read model file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The weights file is not a valid model description.
    #[error("Invalid model file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An input feature is outside the range the model accepts.
    #[error("Invalid feature: {0}")]
    InvalidFeature(String),
}

impl ModelError {
    /// Create a new "invalid feature" error.
    pub fn invalid_feature(msg: impl Into<String>) -> Self {
        Self::InvalidFeature(msg.into())
    }
}

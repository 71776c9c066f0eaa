//! Scoring domain module.
//!
//! The statistical model behind `predict_score` is an external collaborator:
//! the tools domain only depends on the [`ScorePredictor`] trait. This crate
//! ships one concrete implementation, [`LinearScoreModel`], loaded from a
//! JSON weights file produced by the offline training pipeline.

mod error;
mod model;

use std::sync::Arc;

use tracing::{info, warn};

pub use error::ModelError;
pub use model::{GameFeatures, LinearScoreModel, ScorePredictor};

use crate::core::config::ModelConfig;

/// Load the configured predictor, if any.
///
/// A model that fails to load leaves the server running without one; the
/// prediction tool then reports that no model is available.
pub fn load_predictor(config: &ModelConfig) -> Option<Arc<dyn ScorePredictor>> {
    let path = config.path.as_ref()?;
    match LinearScoreModel::from_path(path) {
        Ok(model) => {
            info!("Score model loaded from {}", path.display());
            Some(Arc::new(model))
        }
        Err(e) => {
            warn!("Score model unavailable: {}", e);
            None
        }
    }
}

//! Score predictor trait and the linear model implementation.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// Input features for one prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameFeatures {
    pub price: Option<f64>,
    pub release_month: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// Something that can score a game.
pub trait ScorePredictor: Send + Sync {
    /// Predict a score in `0..=100`.
    fn predict(&self, features: &GameFeatures) -> Result<f64, ModelError>;
}

/// Linear model over price, release month and multi-hot label features.
///
/// Labels the model has no weight for contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearScoreModel {
    pub intercept: f64,
    #[serde(default)]
    pub price_weight: f64,
    #[serde(default)]
    pub release_month_weight: f64,
    /// Price used when a request does not give one (the dataset median).
    #[serde(default)]
    pub default_price: f64,
    #[serde(default)]
    pub tags: HashMap<String, f64>,
    #[serde(default)]
    pub genres: HashMap<String, f64>,
    #[serde(default)]
    pub platforms: HashMap<String, f64>,
}

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

impl LinearScoreModel {
    /// Load a model from a JSON weights file.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a model from its JSON description.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(text)?)
    }

    fn label_sum(weights: &HashMap<String, f64>, labels: &[String]) -> f64 {
        labels.iter().filter_map(|l| weights.get(l)).sum()
    }
}

impl ScorePredictor for LinearScoreModel {
    fn predict(&self, features: &GameFeatures) -> Result<f64, ModelError> {
        let price = features.price.unwrap_or(self.default_price);
        if !price.is_finite() || price < 0.0 {
            return Err(ModelError::invalid_feature(format!(
                "price must be a non-negative number, got {price}"
            )));
        }

        // 0 means "unknown month", as in the training data.
        let month = features.release_month.unwrap_or(0);
        if month > 12 {
            return Err(ModelError::invalid_feature(format!(
                "release_month must be between 1 and 12, got {month}"
            )));
        }

        let score = self.intercept
            + self.price_weight * price
            + self.release_month_weight * f64::from(month)
            + Self::label_sum(&self.tags, &features.tags)
            + Self::label_sum(&self.genres, &features.genres)
            + Self::label_sum(&self.platforms, &features.platforms);

        Ok(score.clamp(MIN_SCORE, MAX_SCORE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn model() -> LinearScoreModel {
        LinearScoreModel::from_json(
            r#"{
                "intercept": 60.0,
                "price_weight": 0.5,
                "release_month_weight": 0.1,
                "default_price": 10.0,
                "tags": {"RPG": 5.0, "Indie": 2.0},
                "genres": {"Adventure": 3.0},
                "platforms": {"PC": 1.0}
            }"#,
        )
        .unwrap()
    }

    fn features(price: Option<f64>, month: Option<u32>) -> GameFeatures {
        GameFeatures {
            price,
            release_month: month,
            ..GameFeatures::default()
        }
    }

    #[test]
    fn test_predict_combines_weights() {
        let features = GameFeatures {
            price: Some(20.0),
            release_month: Some(2),
            tags: vec!["RPG".into(), "Indie".into()],
            genres: vec!["Adventure".into()],
            platforms: vec![],
        };
        let score = model().predict(&features).unwrap();
        assert!((score - (60.0 + 10.0 + 0.2 + 7.0 + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_missing_price_uses_default_and_unknown_labels_ignored() {
        let features = GameFeatures {
            tags: vec!["NotInModel".into()],
            ..features(None, None)
        };
        let score = model().predict(&features).unwrap();
        assert!((score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_clamped() {
        let score = model().predict(&features(Some(1000.0), Some(1))).unwrap();
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_invalid_month_rejected() {
        let err = model().predict(&features(None, Some(13))).unwrap_err();
        assert!(matches!(err, ModelError::InvalidFeature(_)));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(model().predict(&features(Some(-1.0), None)).is_err());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"intercept": 50.0}}"#).unwrap();
        let model = LinearScoreModel::from_path(file.path()).unwrap();
        assert_eq!(model.predict(&GameFeatures::default()).unwrap(), 50.0);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = LinearScoreModel::from_path(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            LinearScoreModel::from_json("not json"),
            Err(ModelError::Parse(_))
        ));
    }
}

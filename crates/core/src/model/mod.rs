//! The two classifier variants and the persisted model artifact.

pub mod forest;

use std::fmt;
use std::path::Path;

use linfa::prelude::*;
use linfa::DatasetBase;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::features::FeatureVector;

pub use forest::{ForestParams, RandomForest};

/// Default iteration cap for the logistic solver.
pub const DEFAULT_LOGISTIC_MAX_ITERATIONS: u64 = 1000;

/// Which classifier variant a model is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    RandomForest,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LogisticRegression => "Logistic Regression",
            Self::RandomForest => "Random Forest",
        })
    }
}

/// A fitted classifier, ready to predict and to be persisted.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum TrainedModel {
    LogisticRegression(FittedLogisticRegression<f64, bool>),
    RandomForest(RandomForest),
}

/// Label and positive-class probability for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub label: bool,
    /// In `[0, 1]`.
    pub probability: f64,
}

impl fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogisticRegression(model) => f
                .debug_struct("LogisticRegression")
                .field("intercept", &model.intercept())
                .field("params", &model.params().to_vec())
                .finish(),
            Self::RandomForest(forest) => f
                .debug_struct("RandomForest")
                .field("trees", &forest.tree_count())
                .finish(),
        }
    }
}

impl TrainedModel {
    /// Fit the L2-regularised logistic variant.
    pub fn fit_logistic(
        records: &Array2<f64>,
        labels: &Array1<bool>,
        max_iterations: u64,
    ) -> Result<Self, CoreError> {
        let dataset = DatasetBase::new(records.clone(), labels.clone());
        let fitted = LogisticRegression::default()
            .max_iterations(max_iterations)
            .fit(&dataset)
            .map_err(|e| CoreError::Model(format!("logistic regression fit failed: {e}")))?;
        Ok(Self::LogisticRegression(fitted))
    }

    /// Fit the bagged decision-tree variant.
    pub fn fit_forest(
        records: &Array2<f64>,
        labels: &Array1<bool>,
        params: &ForestParams,
    ) -> Result<Self, CoreError> {
        RandomForest::fit(records, labels, params).map(Self::RandomForest)
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::LogisticRegression(_) => ModelKind::LogisticRegression,
            Self::RandomForest(_) => ModelKind::RandomForest,
        }
    }

    pub fn predict_labels<D: Data<Elem = f64>>(&self, records: &ArrayBase<D, Ix2>) -> Array1<bool> {
        match self {
            Self::LogisticRegression(model) => model.predict(records),
            Self::RandomForest(forest) => forest.predict_labels(records),
        }
    }

    /// Probability of the positive (reserved) class, per row.
    pub fn positive_probabilities<D: Data<Elem = f64>>(
        &self,
        records: &ArrayBase<D, Ix2>,
    ) -> Array1<f64> {
        match self {
            Self::LogisticRegression(model) => {
                // The solver picks which label it treats as its positive class.
                let probabilities = model.predict_probabilities(records);
                if model.labels().pos.class {
                    probabilities
                } else {
                    probabilities.mapv(|p| 1.0 - p)
                }
            }
            Self::RandomForest(forest) => forest.positive_probabilities(records),
        }
    }

    /// Label and probability for a single feature vector.
    pub fn estimate(&self, features: &FeatureVector) -> Estimate {
        let matrix = features.to_matrix();
        let label = self.predict_labels(&matrix)[0];
        let probability = self.positive_probabilities(&matrix)[0];
        Estimate { label, probability }
    }

    /// Write the model as JSON at `path`.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let json = serde_json::to_vec(self)
            .map_err(|e| CoreError::Model(format!("cannot serialize model: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a model previously written by [`TrainedModel::save`].
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path)
            .map_err(|e| CoreError::Model(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::Model(format!("cannot parse {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::features::FEATURE_COUNT;

    fn separable() -> (Array2<f64>, Array1<bool>) {
        let records = array![
            [0.0, 0.0, 40.0, 0.0, -1.0],
            [1.0, 0.0, 45.0, 0.0, -1.0],
            [0.0, 1.0, 50.0, 0.0, -1.0],
            [1.0, 1.0, 55.0, 0.0, -1.0],
            [0.0, 0.0, 40.0, 2.0, 3.0],
            [1.0, 0.0, 45.0, 1.5, 5.0],
            [0.0, 1.0, 50.0, 1.0, 1.0],
            [1.0, 1.0, 55.0, 2.5, 6.0],
        ];
        let labels = array![false, false, false, false, true, true, true, true];
        (records, labels)
    }

    fn booked() -> FeatureVector {
        FeatureVector {
            sport_type_code: 0,
            location_code: 1,
            price_per_hour: 50.0,
            duration: 2.0,
            weekday: 4,
        }
    }

    fn unbooked() -> FeatureVector {
        FeatureVector {
            duration: 0.0,
            weekday: -1,
            ..booked()
        }
    }

    #[test]
    fn logistic_probability_points_at_reserved_class() {
        let (records, labels) = separable();
        let model = TrainedModel::fit_logistic(&records, &labels, 1000).unwrap();
        assert_eq!(model.kind(), ModelKind::LogisticRegression);

        let yes = model.estimate(&booked());
        let no = model.estimate(&unbooked());
        assert!(yes.probability > no.probability);
        assert!(yes.label);
        assert!(!no.label);
    }

    #[test]
    fn forest_estimates_follow_votes() {
        let (records, labels) = separable();
        let model = TrainedModel::fit_forest(&records, &labels, &ForestParams::default()).unwrap();
        assert_eq!(model.kind(), ModelKind::RandomForest);

        let estimate = model.estimate(&booked());
        assert!((0.0..=1.0).contains(&estimate.probability));
        assert_eq!(estimate.label, estimate.probability > 0.5);
    }

    #[test]
    fn saved_model_predicts_identically() {
        let (records, labels) = separable();
        let dir = tempfile::tempdir().unwrap();

        for model in [
            TrainedModel::fit_logistic(&records, &labels, 1000).unwrap(),
            TrainedModel::fit_forest(&records, &labels, &ForestParams { trees: 10, seed: 3 })
                .unwrap(),
        ] {
            let path = dir.path().join(format!("{}.json", model.kind()));
            model.save(&path).unwrap();
            let loaded = TrainedModel::load(&path).unwrap();

            assert_eq!(loaded.kind(), model.kind());
            let probe = Array2::<f64>::zeros((1, FEATURE_COUNT));
            let before = model.positive_probabilities(&probe)[0];
            let after = loaded.positive_probabilities(&probe)[0];
            assert!((before - after).abs() < 1e-12);
        }
    }

    #[test]
    fn loading_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"not a model").unwrap();
        assert!(TrainedModel::load(&path).is_err());
        assert!(TrainedModel::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(ModelKind::LogisticRegression.to_string(), "Logistic Regression");
        assert_eq!(ModelKind::RandomForest.to_string(), "Random Forest");
    }
}

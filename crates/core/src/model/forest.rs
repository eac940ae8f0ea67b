//! Bagged ensemble of decision trees.
//!
//! Each tree is fit on a bootstrap resample of the training rows. The
//! positive-class probability of a row is the fraction of trees voting
//! positive; a row is labelled positive when that fraction exceeds one half.

use linfa::prelude::*;
use linfa::DatasetBase;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default number of trees in the ensemble.
pub const DEFAULT_TREES: usize = 100;
/// Default seed for bootstrap resampling.
pub const DEFAULT_FOREST_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub trees: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: DEFAULT_TREES,
            seed: DEFAULT_FOREST_SEED,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree<f64, bool>>,
}

impl RandomForest {
    /// Fit `params.trees` trees on bootstrap resamples of `(records, labels)`.
    pub fn fit(
        records: &Array2<f64>,
        labels: &Array1<bool>,
        params: &ForestParams,
    ) -> Result<Self, CoreError> {
        let rows = records.nrows();
        if rows == 0 || params.trees == 0 {
            return Err(CoreError::Model(
                "random forest needs at least one row and one tree".into(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.trees);
        for _ in 0..params.trees {
            let sample: Vec<usize> = (0..rows).map(|_| rng.random_range(0..rows)).collect();
            let dataset = DatasetBase::new(
                records.select(Axis(0), &sample),
                labels.select(Axis(0), &sample),
            );
            let tree = DecisionTree::params()
                .fit(&dataset)
                .map_err(|e| CoreError::Model(format!("decision tree fit failed: {e}")))?;
            trees.push(tree);
        }

        Ok(Self { trees })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Fraction of trees voting positive, per row.
    pub fn positive_probabilities<D: Data<Elem = f64>>(
        &self,
        records: &ArrayBase<D, Ix2>,
    ) -> Array1<f64> {
        let mut votes = Array1::<f64>::zeros(records.nrows());
        for tree in &self.trees {
            let predicted: Array1<bool> = tree.predict(records);
            for (vote, positive) in votes.iter_mut().zip(predicted.iter()) {
                if *positive {
                    *vote += 1.0;
                }
            }
        }
        votes / self.trees.len().max(1) as f64
    }

    pub fn predict_labels<D: Data<Elem = f64>>(&self, records: &ArrayBase<D, Ix2>) -> Array1<bool> {
        self.positive_probabilities(records).mapv(|p| p > 0.5)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

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

    #[test]
    fn fits_requested_number_of_trees() {
        let (records, labels) = separable();
        let params = ForestParams { trees: 7, seed: 1 };
        let forest = RandomForest::fit(&records, &labels, &params).unwrap();
        assert_eq!(forest.tree_count(), 7);
    }

    #[test]
    fn probabilities_are_vote_fractions() {
        let (records, labels) = separable();
        let forest = RandomForest::fit(&records, &labels, &ForestParams::default()).unwrap();
        let probabilities = forest.positive_probabilities(&records);
        for p in probabilities.iter() {
            assert!((0.0..=1.0).contains(p));
            let scaled = p * DEFAULT_TREES as f64;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_same_forest_output() {
        let (records, labels) = separable();
        let a = RandomForest::fit(&records, &labels, &ForestParams::default()).unwrap();
        let b = RandomForest::fit(&records, &labels, &ForestParams::default()).unwrap();
        assert_eq!(
            a.positive_probabilities(&records),
            b.positive_probabilities(&records)
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        let records = Array2::<f64>::zeros((0, 5));
        let labels = Array1::<bool>::from_elem(0, false);
        assert!(RandomForest::fit(&records, &labels, &ForestParams::default()).is_err());
    }
}

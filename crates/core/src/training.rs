//! Model training: encode the dataset, split it, fit both classifier
//! variants, evaluate them on the held-out rows and keep the better one.

use ndarray::Axis;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::TrainingExample;
use crate::encoding::FeatureEncoders;
use crate::error::CoreError;
use crate::features::{FeatureMatrix, FEATURE_NAMES};
use crate::metrics::ClassificationReport;
use crate::model::{ForestParams, ModelKind, TrainedModel, DEFAULT_LOGISTIC_MAX_ITERATIONS};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Default share of rows held out for evaluation.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
/// Default seed of the train/test permutation.
pub const DEFAULT_SPLIT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingParams {
    pub test_fraction: f64,
    pub split_seed: u64,
    pub logistic_max_iterations: u64,
    pub forest: ForestParams,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            split_seed: DEFAULT_SPLIT_SEED,
            logistic_max_iterations: DEFAULT_LOGISTIC_MAX_ITERATIONS,
            forest: ForestParams::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seeded random split of `rows` indices.
///
/// The test partition holds `ceil(rows * test_fraction)` rows. Both
/// partitions must end up non-empty.
pub fn train_test_split(
    rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, CoreError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(CoreError::Validation(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    let test_rows = (rows as f64 * test_fraction).ceil() as usize;
    if test_rows == 0 || test_rows >= rows {
        return Err(CoreError::Model(format!(
            "cannot split {rows} rows with test fraction {test_fraction}"
        )));
    }

    let mut order: Vec<usize> = (0..rows).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    let train = order.split_off(test_rows);
    Ok(TrainTestSplit { train, test: order })
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Pick the variant to keep from the two test accuracies.
///
/// The random forest wins only with a strictly higher accuracy; a tie keeps
/// the logistic model.
pub fn select_variant(logistic_accuracy: f64, forest_accuracy: f64) -> ModelKind {
    if forest_accuracy > logistic_accuracy {
        ModelKind::RandomForest
    } else {
        ModelKind::LogisticRegression
    }
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

/// Held-out evaluation of one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantEvaluation {
    pub kind: ModelKind,
    pub accuracy: f64,
    pub report: ClassificationReport,
}

/// Everything a training run produces.
#[derive(Debug)]
pub struct TrainingOutcome {
    /// Encoders fit on the full dataset snapshot.
    pub encoders: FeatureEncoders,
    /// The selected model.
    pub model: TrainedModel,
    /// Logistic first, forest second.
    pub evaluations: [VariantEvaluation; 2],
    pub train_rows: usize,
    pub test_rows: usize,
}

impl TrainingOutcome {
    pub fn selected(&self) -> ModelKind {
        self.model.kind()
    }
}

fn evaluate(model: &TrainedModel, matrix: &FeatureMatrix) -> VariantEvaluation {
    let truth = matrix.labels.to_vec();
    let predicted = model.predict_labels(&matrix.records).to_vec();
    let report = ClassificationReport::compute(&truth, &predicted);
    VariantEvaluation {
        kind: model.kind(),
        accuracy: report.accuracy,
        report,
    }
}

fn subset(matrix: &FeatureMatrix, rows: &[usize]) -> FeatureMatrix {
    FeatureMatrix {
        records: matrix.records.select(Axis(0), rows),
        labels: matrix.labels.select(Axis(0), rows),
    }
}

/// Fit, evaluate and select a classifier for `examples`.
pub fn train(
    examples: &[TrainingExample],
    params: &TrainingParams,
) -> Result<TrainingOutcome, CoreError> {
    if examples.is_empty() {
        return Err(CoreError::Model("dataset is empty".into()));
    }

    let encoders = FeatureEncoders::fit(examples);
    let matrix = FeatureMatrix::build(&encoders, examples)?;
    tracing::info!(
        rows = matrix.len(),
        features = ?FEATURE_NAMES,
        sport_types = encoders.sport_type.classes().len(),
        locations = encoders.location.classes().len(),
        "Encoded dataset",
    );

    let split = train_test_split(matrix.len(), params.test_fraction, params.split_seed)?;
    let train_set = subset(&matrix, &split.train);
    let test_set = subset(&matrix, &split.test);

    let positives = train_set.labels.iter().filter(|&&l| l).count();
    if positives == 0 || positives == train_set.len() {
        return Err(CoreError::Model(
            "training partition must contain both reserved and unreserved rows".into(),
        ));
    }

    let logistic = TrainedModel::fit_logistic(
        &train_set.records,
        &train_set.labels,
        params.logistic_max_iterations,
    )?;
    let forest = TrainedModel::fit_forest(&train_set.records, &train_set.labels, &params.forest)?;

    let logistic_eval = evaluate(&logistic, &test_set);
    let forest_eval = evaluate(&forest, &test_set);
    let selected = select_variant(logistic_eval.accuracy, forest_eval.accuracy);
    tracing::info!(
        logistic_accuracy = logistic_eval.accuracy,
        forest_accuracy = forest_eval.accuracy,
        selected = %selected,
        "Evaluated classifier variants",
    );

    let model = match selected {
        ModelKind::LogisticRegression => logistic,
        ModelKind::RandomForest => forest,
    };

    Ok(TrainingOutcome {
        encoders,
        model,
        evaluations: [logistic_eval, forest_eval],
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

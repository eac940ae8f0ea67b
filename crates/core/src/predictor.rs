//! Single (user, field) reservation prediction.
//!
//! A [`Predictor`] is built explicitly from fitted encoders and a trained
//! model; nothing is read from process-wide state. [`Predictor::predict`]
//! looks the field and any prior reservation up in a [`RecordStore`],
//! encodes them and asks the model.

use std::path::Path;

use serde::Serialize;

use crate::dataset::{read_dataset, weekday_of};
use crate::encoding::FeatureEncoders;
use crate::error::CoreError;
use crate::features::FeatureVector;
use crate::model::TrainedModel;
use crate::store::RecordStore;
use crate::types::RecordId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a prediction could not be produced.
///
/// The `Display` text of each variant is what callers receive in the
/// `{"error": ...}` document.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Ai nevoie de userId și fieldId")]
    MissingArguments,

    #[error("Terenul nu a fost găsit")]
    FieldNotFound { field_id: RecordId },

    #[error("Valori necunoscute pentru sport/location")]
    UnknownCategory { column: &'static str, value: String },

    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for PredictError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownCategory { column, value } => Self::UnknownCategory { column, value },
            other => Self::Core(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Successful prediction as emitted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub predicted: bool,
    /// Positive-class probability as a percentage, two decimals.
    pub probability: f64,
}

/// Coarse reading of a probability, as shown next to a field in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    High,
    Medium,
    Low,
}

/// Percentage at or above which a reservation is considered likely.
pub const HIGH_LIKELIHOOD_PERCENT: f64 = 70.0;
/// Percentage at or above which a reservation is considered possible.
pub const MEDIUM_LIKELIHOOD_PERCENT: f64 = 40.0;

impl Likelihood {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= HIGH_LIKELIHOOD_PERCENT {
            Self::High
        } else if percent >= MEDIUM_LIKELIHOOD_PERCENT {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Convert a `[0, 1]` probability to a percentage rounded to two decimals.
pub fn to_percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}

impl Prediction {
    pub fn likelihood(&self) -> Likelihood {
        Likelihood::from_percent(self.probability)
    }
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Predictor {
    encoders: FeatureEncoders,
    model: TrainedModel,
}

impl Predictor {
    pub fn new(encoders: FeatureEncoders, model: TrainedModel) -> Self {
        Self { encoders, model }
    }

    /// Load the model artifact and refit the encoders from the dataset
    /// snapshot the model was trained on.
    pub fn load(model_path: &Path, dataset_path: &Path) -> Result<Self, CoreError> {
        let model = TrainedModel::load(model_path)?;
        let examples = read_dataset(dataset_path)?;
        let encoders = FeatureEncoders::fit(&examples);
        tracing::debug!(
            model = %model.kind(),
            rows = examples.len(),
            "Loaded predictor artifacts",
        );
        Ok(Self::new(encoders, model))
    }

    pub fn encoders(&self) -> &FeatureEncoders {
        &self.encoders
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Predict whether `user_id` will reserve `field_id`.
    ///
    /// Without a prior reservation of the pair the model sees a zero
    /// duration and the weekday sentinel.
    pub async fn predict(
        &self,
        store: &dyn RecordStore,
        user_id: &RecordId,
        field_id: &RecordId,
    ) -> Result<Prediction, PredictError> {
        let field = store
            .find_field(field_id)
            .await?
            .ok_or_else(|| PredictError::FieldNotFound {
                field_id: field_id.clone(),
            })?;

        let reservation = store.find_reservation(user_id, field_id).await?;
        let duration = reservation
            .as_ref()
            .and_then(|r| r.duration)
            .unwrap_or(0.0);
        let weekday = weekday_of(reservation.as_ref().and_then(|r| r.date.as_ref()));

        let features = FeatureVector::encode(
            &self.encoders,
            &field.sport_type,
            &field.location,
            field.price_per_hour,
            duration,
            weekday,
        )?;

        let estimate = self.model.estimate(&features);
        let prediction = Prediction {
            predicted: estimate.label,
            probability: to_percent(estimate.probability),
        };
        tracing::info!(
            user_id = %user_id,
            field_id = %field_id,
            prior_reservation = reservation.is_some(),
            predicted = prediction.predicted,
            probability = prediction.probability,
            likelihood = prediction.likelihood().label(),
            "Prediction complete",
        );
        Ok(prediction)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

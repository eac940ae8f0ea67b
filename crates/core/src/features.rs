//! Numeric feature vectors fed to the classifiers.

use ndarray::{Array1, Array2};

use crate::dataset::TrainingExample;
use crate::encoding::FeatureEncoders;
use crate::error::CoreError;

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 5;

/// Model input names, in column order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "sportType_enc",
    "location_enc",
    "pricePerHour",
    "duration",
    "weekday",
];

/// One encoded model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub sport_type_code: usize,
    pub location_code: usize,
    pub price_per_hour: f64,
    pub duration: f64,
    /// Monday = 0 .. Sunday = 6, or [`crate::dataset::WEEKDAY_SENTINEL`].
    pub weekday: i32,
}

impl FeatureVector {
    /// Encode raw attributes. Fails on a category the encoders never saw.
    pub fn encode(
        encoders: &FeatureEncoders,
        sport_type: &str,
        location: &str,
        price_per_hour: f64,
        duration: f64,
        weekday: i32,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            sport_type_code: encoders.sport_type.encode(sport_type)?,
            location_code: encoders.location.encode(location)?,
            price_per_hour,
            duration,
            weekday,
        })
    }

    /// Encode a dataset row.
    pub fn from_example(
        encoders: &FeatureEncoders,
        example: &TrainingExample,
    ) -> Result<Self, CoreError> {
        Self::encode(
            encoders,
            &example.sport_type,
            &example.location,
            example.price_per_hour,
            example.effective_duration(),
            example.weekday(),
        )
    }

    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.sport_type_code as f64,
            self.location_code as f64,
            self.price_per_hour,
            self.duration,
            self.weekday as f64,
        ]
    }

    /// A single-row matrix, the shape the classifiers predict on.
    pub fn to_matrix(&self) -> Array2<f64> {
        let values = self.to_array();
        Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| values[j])
    }
}

/// Feature matrix and label vector of a whole dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub records: Array2<f64>,
    pub labels: Array1<bool>,
}

impl FeatureMatrix {
    /// Encode every row of `examples` with `encoders`.
    pub fn build(
        encoders: &FeatureEncoders,
        examples: &[TrainingExample],
    ) -> Result<Self, CoreError> {
        let mut records = Array2::<f64>::zeros((examples.len(), FEATURE_COUNT));
        let mut labels = Array1::<bool>::from_elem(examples.len(), false);

        for (i, example) in examples.iter().enumerate() {
            let vector = FeatureVector::from_example(encoders, example)?;
            for (j, value) in vector.to_array().into_iter().enumerate() {
                records[(i, j)] = value;
            }
            labels[i] = example.is_reserved();
        }

        Ok(Self { records, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{read_examples, WEEKDAY_SENTINEL};

    const DATASET: &str = "\
user_id,field_id,sportType,location,pricePerHour,duration,date,reserved
u1,f1,tennis,downtown,50,2,2025-03-03T10:00:00+00:00,1
u1,f2,football,uptown,80,0.0,,0
";

    #[test]
    fn matrix_columns_follow_feature_order() {
        let rows = read_examples(DATASET.as_bytes()).unwrap();
        let encoders = FeatureEncoders::fit(&rows);
        let matrix = FeatureMatrix::build(&encoders, &rows).unwrap();

        assert_eq!(matrix.records.dim(), (2, FEATURE_COUNT));
        // tennis sorts after football, downtown before uptown; 2025-03-03 is a Monday.
        assert_eq!(matrix.records.row(0).to_vec(), vec![1.0, 0.0, 50.0, 2.0, 0.0]);
        assert_eq!(matrix.records.row(1).to_vec(), vec![0.0, 1.0, 80.0, 0.0, -1.0]);
        assert_eq!(matrix.labels.to_vec(), vec![true, false]);
    }

    #[test]
    fn single_vector_matrix_shape() {
        let rows = read_examples(DATASET.as_bytes()).unwrap();
        let encoders = FeatureEncoders::fit(&rows);
        let vector =
            FeatureVector::encode(&encoders, "tennis", "uptown", 50.0, 0.0, WEEKDAY_SENTINEL)
                .unwrap();
        let matrix = vector.to_matrix();
        assert_eq!(matrix.dim(), (1, FEATURE_COUNT));
        assert_eq!(matrix.row(0).to_vec(), vec![1.0, 1.0, 50.0, 0.0, -1.0]);
    }

    #[test]
    fn unknown_location_fails_encoding() {
        let rows = read_examples(DATASET.as_bytes()).unwrap();
        let encoders = FeatureEncoders::fit(&rows);
        assert!(FeatureVector::encode(&encoders, "tennis", "airport", 50.0, 0.0, 3).is_err());
    }
}

//! Categorical-to-integer encoding of field attributes.
//!
//! Codes are assigned by byte-wise lexicographic order of the distinct
//! values observed when the encoder is fit, so refitting on the same dataset
//! reproduces the same codes. Codes from encoders fit on different datasets
//! are not comparable.

use std::collections::BTreeSet;

use crate::dataset::TrainingExample;
use crate::error::CoreError;

/// Column name of the sport type attribute.
pub const SPORT_TYPE_COLUMN: &str = "sportType";
/// Column name of the location attribute.
pub const LOCATION_COLUMN: &str = "location";

/// Maps each distinct value of one column to a dense integer code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEncoder {
    column: &'static str,
    /// Sorted, deduplicated. A value's code is its index.
    classes: Vec<String>,
}

impl CategoryEncoder {
    /// Fit an encoder from the values observed in `column`.
    pub fn fit<I, S>(column: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();
        Self {
            column,
            classes: classes.into_iter().collect(),
        }
    }

    /// Code of `value`, or [`CoreError::UnknownCategory`] if it was never seen.
    pub fn encode(&self, value: &str) -> Result<usize, CoreError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map_err(|_| CoreError::UnknownCategory {
                column: self.column,
                value: value.to_string(),
            })
    }

    /// Known values, in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// The encoders for every categorical feature of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEncoders {
    pub sport_type: CategoryEncoder,
    pub location: CategoryEncoder,
}

impl FeatureEncoders {
    /// Fit both encoders from one dataset snapshot.
    pub fn fit(examples: &[TrainingExample]) -> Self {
        Self {
            sport_type: CategoryEncoder::fit(
                SPORT_TYPE_COLUMN,
                examples.iter().map(|e| e.sport_type.as_str()),
            ),
            location: CategoryEncoder::fit(
                LOCATION_COLUMN,
                examples.iter().map(|e| e.location.as_str()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn codes_follow_sorted_order() {
        let enc = CategoryEncoder::fit(SPORT_TYPE_COLUMN, ["tennis", "basketball", "tennis", "football"]);
        assert_eq!(enc.classes(), ["basketball", "football", "tennis"]);
        assert_eq!(enc.encode("basketball").unwrap(), 0);
        assert_eq!(enc.encode("football").unwrap(), 1);
        assert_eq!(enc.encode("tennis").unwrap(), 2);
    }

    #[test]
    fn ordering_is_bytewise() {
        let enc = CategoryEncoder::fit(LOCATION_COLUMN, ["b", "B", "a", "Ă"]);
        assert_eq!(enc.classes(), ["B", "a", "b", "Ă"]);
    }

    #[test]
    fn same_snapshot_gives_same_codes() {
        let values = ["uptown", "downtown", "harbor"];
        let first = CategoryEncoder::fit(LOCATION_COLUMN, values);
        let second = CategoryEncoder::fit(LOCATION_COLUMN, values.iter().rev());
        for value in values {
            assert_eq!(first.encode(value).unwrap(), second.encode(value).unwrap());
        }
    }

    #[test]
    fn refit_on_different_snapshot_may_shift_codes() {
        let before = CategoryEncoder::fit(LOCATION_COLUMN, ["downtown", "uptown"]);
        let after = CategoryEncoder::fit(LOCATION_COLUMN, ["airport", "downtown", "uptown"]);
        assert_eq!(before.encode("downtown").unwrap(), 0);
        assert_eq!(after.encode("downtown").unwrap(), 1);
    }

    #[test]
    fn unknown_category_is_a_typed_error() {
        let enc = CategoryEncoder::fit(SPORT_TYPE_COLUMN, ["tennis"]);
        assert_matches!(
            enc.encode("padel"),
            Err(CoreError::UnknownCategory { column: "sportType", ref value }) if value == "padel"
        );
    }

    #[test]
    fn empty_encoder_rejects_everything() {
        let enc = CategoryEncoder::fit(SPORT_TYPE_COLUMN, Vec::<String>::new());
        assert!(enc.classes().is_empty());
        assert!(enc.encode("tennis").is_err());
    }
}

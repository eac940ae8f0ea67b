use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use field2go_core::dataset::SamplingParams;
use field2go_core::error::CoreError;
use field2go_core::model::ForestParams;
use field2go_core::training::TrainingParams;

/// Default dataset file, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "dataset.csv";
/// Default model artifact, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "model.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Pipeline configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` has a default suitable for running the
/// three commands from one working directory.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Only the commands that talk to the record store need it.
    pub database_url: Option<String>,
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub sampling: SamplingParams,
    /// Fixed seed for negative sampling; `None` draws from the OS.
    pub sampling_seed: Option<u64>,
    pub training: TrainingParams,
    /// Prompt for an ad hoc prediction after training.
    pub manual_prediction: bool,
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default        |
    /// |---------------------------|----------------|
    /// | `DATABASE_URL`            | --             |
    /// | `DATASET_PATH`            | `dataset.csv`  |
    /// | `MODEL_PATH`              | `model.json`   |
    /// | `NEGATIVES_PER_USER`      | `3`            |
    /// | `SAMPLING_SEED`           | unset          |
    /// | `SPLIT_SEED`              | `42`           |
    /// | `TEST_FRACTION`           | `0.2`          |
    /// | `FOREST_TREES`            | `100`          |
    /// | `FOREST_SEED`             | `42`           |
    /// | `LOGISTIC_MAX_ITERATIONS` | `1000`         |
    /// | `TRAIN_MANUAL_PREDICTION` | `true`         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PipelineConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let training_defaults = TrainingParams::default();
        let forest_defaults = ForestParams::default();

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let dataset_path = lookup("DATASET_PATH")
            .unwrap_or_else(|| DEFAULT_DATASET_PATH.into())
            .into();
        let model_path = lookup("MODEL_PATH")
            .unwrap_or_else(|| DEFAULT_MODEL_PATH.into())
            .into();

        let negatives_per_user = parse_or(
            &lookup,
            "NEGATIVES_PER_USER",
            SamplingParams::default().negatives_per_user,
        )?;
        let sampling_seed = match lookup("SAMPLING_SEED") {
            Some(raw) => Some(parse_value("SAMPLING_SEED", &raw)?),
            None => None,
        };

        let test_fraction: f64 =
            parse_or(&lookup, "TEST_FRACTION", training_defaults.test_fraction)?;
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(ConfigError::Invalid {
                var: "TEST_FRACTION",
                value: test_fraction.to_string(),
                reason: "must be strictly between 0 and 1".into(),
            });
        }

        let training = TrainingParams {
            test_fraction,
            split_seed: parse_or(&lookup, "SPLIT_SEED", training_defaults.split_seed)?,
            logistic_max_iterations: parse_or(
                &lookup,
                "LOGISTIC_MAX_ITERATIONS",
                training_defaults.logistic_max_iterations,
            )?,
            forest: ForestParams {
                trees: parse_or(&lookup, "FOREST_TREES", forest_defaults.trees)?,
                seed: parse_or(&lookup, "FOREST_SEED", forest_defaults.seed)?,
            },
        };

        let manual_prediction = match lookup("TRAIN_MANUAL_PREDICTION") {
            Some(raw) => parse_flag("TRAIN_MANUAL_PREDICTION", &raw)?,
            None => true,
        };

        Ok(Self {
            database_url,
            dataset_path,
            model_path,
            sampling: SamplingParams { negatives_per_user },
            sampling_seed,
            training,
            manual_prediction,
        })
    }

    /// The record store URL, for commands that cannot run without it.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }
}

fn parse_value<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_or<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => parse_value(var, &raw),
        None => Ok(default),
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected true or false".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<PipelineConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PipelineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = load(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.dataset_path, PathBuf::from("dataset.csv"));
        assert_eq!(config.model_path, PathBuf::from("model.json"));
        assert_eq!(config.sampling.negatives_per_user, 3);
        assert_eq!(config.sampling_seed, None);
        assert_eq!(config.training, TrainingParams::default());
        assert!(config.manual_prediction);
        assert_matches!(config.database_url(), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/field2go"),
            ("DATASET_PATH", "/tmp/ds.csv"),
            ("NEGATIVES_PER_USER", "5"),
            ("SAMPLING_SEED", "9"),
            ("FOREST_TREES", "10"),
            ("TEST_FRACTION", "0.25"),
            ("TRAIN_MANUAL_PREDICTION", "false"),
        ])
        .unwrap();
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/field2go");
        assert_eq!(config.dataset_path, PathBuf::from("/tmp/ds.csv"));
        assert_eq!(config.sampling.negatives_per_user, 5);
        assert_eq!(config.sampling_seed, Some(9));
        assert_eq!(config.training.forest.trees, 10);
        assert_eq!(config.training.test_fraction, 0.25);
        assert!(!config.manual_prediction);
    }

    #[test]
    fn invalid_numbers_are_reported() {
        assert_matches!(
            load(&[("NEGATIVES_PER_USER", "three")]),
            Err(ConfigError::Invalid { var: "NEGATIVES_PER_USER", .. })
        );
        assert_matches!(
            load(&[("TEST_FRACTION", "1.5")]),
            Err(ConfigError::Invalid { var: "TEST_FRACTION", .. })
        );
        assert_matches!(
            load(&[("TRAIN_MANUAL_PREDICTION", "maybe")]),
            Err(ConfigError::Invalid { var: "TRAIN_MANUAL_PREDICTION", .. })
        );
    }

    #[test]
    fn blank_database_url_counts_as_missing() {
        let config = load(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url().is_err());
    }
}

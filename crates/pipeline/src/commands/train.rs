//! Train both classifier variants on the dataset file, report on them and
//! persist the better one.

use std::io::{BufRead, Write};
use std::str::FromStr;

use field2go_core::dataset::{read_dataset, WEEKDAY_SENTINEL};
use field2go_core::encoding::FeatureEncoders;
use field2go_core::error::CoreError;
use field2go_core::features::FeatureVector;
use field2go_core::model::TrainedModel;
use field2go_core::predictor::{to_percent, Prediction};
use field2go_core::training::{train, TrainingOutcome};

use crate::config::PipelineConfig;

/// Train from `config.dataset_path` and save to `config.model_path`.
///
/// Reports go to `out`. When `config.manual_prediction` is set, one ad hoc
/// prediction is then read from `input`.
pub fn run<R, W>(config: &PipelineConfig, input: R, out: &mut W) -> Result<TrainingOutcome, CoreError>
where
    R: BufRead,
    W: Write,
{
    let examples = read_dataset(&config.dataset_path)?;
    tracing::info!(
        path = %config.dataset_path.display(),
        rows = examples.len(),
        "Loaded dataset",
    );

    let outcome = train(&examples, &config.training)?;

    for evaluation in &outcome.evaluations {
        writeln!(out, "=== {} ===", evaluation.kind)?;
        writeln!(out, "{}", evaluation.report)?;
    }

    outcome.model.save(&config.model_path)?;
    tracing::info!(
        path = %config.model_path.display(),
        model = %outcome.selected(),
        train_rows = outcome.train_rows,
        test_rows = outcome.test_rows,
        "Model saved",
    );
    writeln!(out, "Selected model: {}", outcome.selected())?;

    if config.manual_prediction {
        manual_prediction(&outcome.encoders, &outcome.model, input, out)?;
    }

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Manual prediction
// ---------------------------------------------------------------------------

/// Why the prompt stopped before producing a prediction.
#[derive(Debug)]
enum Abort {
    EndOfInput,
    Invalid(String),
}

/// Prompt for one set of raw attributes and print the model's answer.
///
/// Returns `Ok(None)` when the input ends early or an answer is rejected;
/// only I/O failures on `out` are errors.
pub fn manual_prediction<R, W>(
    encoders: &FeatureEncoders,
    model: &TrainedModel,
    mut input: R,
    out: &mut W,
) -> Result<Option<Prediction>, CoreError>
where
    R: BufRead,
    W: Write,
{
    writeln!(out)?;
    writeln!(out, "=== Manual prediction ===")?;

    match ask_features(encoders, &mut input, out)? {
        Ok(features) => {
            let estimate = model.estimate(&features);
            let prediction = Prediction {
                predicted: estimate.label,
                probability: to_percent(estimate.probability),
            };
            writeln!(
                out,
                "Prediction: {} (probability {}%, {} likelihood)",
                if prediction.predicted {
                    "will reserve"
                } else {
                    "will not reserve"
                },
                prediction.probability,
                prediction.likelihood().label(),
            )?;
            Ok(Some(prediction))
        }
        Err(Abort::EndOfInput) => {
            tracing::info!("Input closed, skipping manual prediction");
            Ok(None)
        }
        Err(Abort::Invalid(reason)) => {
            writeln!(out, "Cannot predict: {reason}")?;
            Ok(None)
        }
    }
}

fn ask_features<R, W>(
    encoders: &FeatureEncoders,
    input: &mut R,
    out: &mut W,
) -> Result<Result<FeatureVector, Abort>, CoreError>
where
    R: BufRead,
    W: Write,
{
    let sport_type = match ask(
        input,
        out,
        &format!("Sport type (one of {:?}): ", encoders.sport_type.classes()),
    )? {
        Some(v) => v,
        None => return Ok(Err(Abort::EndOfInput)),
    };
    let location = match ask(
        input,
        out,
        &format!("Location (one of {:?}): ", encoders.location.classes()),
    )? {
        Some(v) => v,
        None => return Ok(Err(Abort::EndOfInput)),
    };

    // Reject unknown categories before asking for the numbers.
    let (sport_type_code, location_code) = match (
        encoders.sport_type.encode(&sport_type),
        encoders.location.encode(&location),
    ) {
        (Ok(s), Ok(l)) => (s, l),
        (Err(e), _) | (_, Err(e)) => return Ok(Err(Abort::Invalid(e.to_string()))),
    };

    let price_per_hour: f64 = match ask_number(input, out, "Price per hour: ")? {
        Ok(v) => v,
        Err(abort) => return Ok(Err(abort)),
    };
    let duration: f64 = match ask_number(input, out, "Duration (hours): ")? {
        Ok(v) => v,
        Err(abort) => return Ok(Err(abort)),
    };
    let weekday: i32 = match ask_number(
        input,
        out,
        &format!("Weekday (0 = Monday .. 6 = Sunday, {WEEKDAY_SENTINEL} = unknown): "),
    )? {
        Ok(v) => v,
        Err(abort) => return Ok(Err(abort)),
    };
    if !(WEEKDAY_SENTINEL..=6).contains(&weekday) {
        return Ok(Err(Abort::Invalid(format!(
            "weekday must be between {WEEKDAY_SENTINEL} and 6, got {weekday}"
        ))));
    }

    Ok(Ok(FeatureVector {
        sport_type_code,
        location_code,
        price_per_hour,
        duration,
        weekday,
    }))
}

/// Print `prompt` and read one trimmed line. `None` at end of input.
fn ask<R, W>(input: &mut R, out: &mut W, prompt: &str) -> Result<Option<String>, CoreError>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask_number<T, R, W>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<Result<T, Abort>, CoreError>
where
    T: FromStr,
    R: BufRead,
    W: Write,
{
    let Some(raw) = ask(input, out, prompt)? else {
        return Ok(Err(Abort::EndOfInput));
    };
    Ok(raw
        .parse()
        .map_err(|_| Abort::Invalid(format!("{raw:?} is not a valid number"))))
}

//! `train-model` -- fit, compare and persist the reservation classifier.
//!
//! Reads `DATASET_PATH`, prints a classification report for each variant
//! and writes the selected model to `MODEL_PATH`. Unless
//! `TRAIN_MANUAL_PREDICTION=false`, then prompts for one manual prediction.

use field2go_pipeline::commands::train;
use field2go_pipeline::config::PipelineConfig;
use field2go_pipeline::telemetry;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("field2go_pipeline=info,train_model=info");

    let config = PipelineConfig::from_env()?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    train::run(&config, stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

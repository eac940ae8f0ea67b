//! `build-dataset` -- export the labeled reservation dataset.
//!
//! Reads every user, field and reservation from PostgreSQL and writes the
//! dataset CSV to `DATASET_PATH`. See [`PipelineConfig`] for the
//! environment variables.

use anyhow::Context;
use field2go_pipeline::commands::build_dataset;
use field2go_pipeline::config::PipelineConfig;
use field2go_pipeline::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("field2go_pipeline=info,build_dataset=info");

    let config = PipelineConfig::from_env()?;
    let pool = field2go_db::create_pool(config.database_url()?)
        .await
        .context("Failed to connect to database")?;
    field2go_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    let store = field2go_db::PgRecordStore::new(pool);
    let summary = build_dataset::run(&store, &config).await?;

    tracing::info!(
        users = summary.users,
        rows = summary.positives + summary.negatives,
        "Dataset build complete",
    );
    Ok(())
}

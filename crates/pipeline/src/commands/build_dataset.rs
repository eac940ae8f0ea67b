//! Export the labeled dataset from the record store.

use field2go_core::dataset::{build_dataset, write_dataset, BuildSummary};
use field2go_core::error::CoreError;
use field2go_core::store::RecordStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PipelineConfig;

/// Read every record, build the dataset and write it to
/// `config.dataset_path`, replacing any previous file.
pub async fn run(store: &dyn RecordStore, config: &PipelineConfig) -> Result<BuildSummary, CoreError> {
    let users = store.users().await?;
    let fields = store.fields().await?;
    let reservations = store.reservations().await?;
    tracing::info!(
        users = users.len(),
        fields = fields.len(),
        reservations = reservations.len(),
        "Loaded records",
    );

    let mut rng = match config.sampling_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let built = build_dataset(&users, &fields, &reservations, &config.sampling, &mut rng);

    write_dataset(&config.dataset_path, &built.examples)?;
    tracing::info!(
        path = %config.dataset_path.display(),
        rows = built.examples.len(),
        positives = built.summary.positives,
        negatives = built.summary.negatives,
        skipped_reservations = built.summary.skipped_reservations,
        duplicate_pairs = built.summary.duplicate_pairs,
        "Dataset written",
    );

    Ok(built.summary)
}

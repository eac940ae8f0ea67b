//! Predict one (user, field) pair and render the answer as a single JSON
//! document.

use field2go_core::error::CoreError;
use field2go_core::predictor::{PredictError, Prediction, Predictor};
use field2go_core::store::RecordStore;
use field2go_core::types::RecordId;
use field2go_db::{create_pool, PgRecordStore};
use serde::Serialize;

use crate::config::PipelineConfig;

/// Identifiers taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictRequest {
    pub user_id: RecordId,
    pub field_id: RecordId,
}

/// Parse `<userId> <fieldId>` from the arguments after the program name.
///
/// Extra arguments are ignored. A missing or blank identifier is
/// [`PredictError::MissingArguments`].
pub fn parse_args(args: &[String]) -> Result<PredictRequest, PredictError> {
    let [user_id, field_id, ..] = args else {
        return Err(PredictError::MissingArguments);
    };
    let user_id = user_id
        .parse()
        .map_err(|_| PredictError::MissingArguments)?;
    let field_id = field_id
        .parse()
        .map_err(|_| PredictError::MissingArguments)?;
    Ok(PredictRequest { user_id, field_id })
}

/// The document written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Prediction(Prediction),
    Error { error: String },
}

impl PredictResponse {
    pub fn from_result(result: Result<Prediction, PredictError>) -> Self {
        match result {
            Ok(prediction) => Self::Prediction(prediction),
            Err(err) => Self::Error {
                error: err.to_string(),
            },
        }
    }

    /// Process exit status for this response.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Prediction(_) => 0,
            Self::Error { .. } => 1,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }
}

/// Run a prediction against an already loaded predictor and store.
pub async fn execute(
    predictor: &Predictor,
    store: &dyn RecordStore,
    request: &PredictRequest,
) -> Result<Prediction, PredictError> {
    predictor
        .predict(store, &request.user_id, &request.field_id)
        .await
}

/// Full command: validate arguments, load configuration and artifacts,
/// connect to the store and predict.
pub async fn run(args: &[String]) -> PredictResponse {
    PredictResponse::from_result(run_inner(args).await)
}

async fn run_inner(args: &[String]) -> Result<Prediction, PredictError> {
    let request = parse_args(args)?;
    let config = PipelineConfig::from_env().map_err(CoreError::from)?;
    let predictor = Predictor::load(&config.model_path, &config.dataset_path)?;

    let database_url = config.database_url().map_err(CoreError::from)?;
    let pool = create_pool(database_url).await.map_err(|e| {
        tracing::error!(error = %e, "Cannot connect to record store");
        CoreError::Store(e.to_string())
    })?;
    let store = PgRecordStore::new(pool);

    execute(&predictor, &store, &request).await
}

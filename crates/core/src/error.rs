#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A categorical value that was never seen when the encoder was fit.
    #[error("Unknown category for {column}: {value:?}")]
    UnknownCategory { column: &'static str, value: String },

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        Self::Dataset(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

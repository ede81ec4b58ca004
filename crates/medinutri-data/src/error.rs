use thiserror::Error;

use medinutri_core::error::MediNutriError;

/// Errors raised while reading dataset sources.
///
/// These never escape [`crate::DatasetIndex::load`]: a failing source is logged
/// and its collection is left empty.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DataError> for MediNutriError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Io(e) => MediNutriError::Io(e),
            DataError::Json(e) => MediNutriError::Serialization(e.to_string()),
            other => MediNutriError::DataLoad {
                kind: "dataset".to_string(),
                reason: other.to_string(),
            },
        }
    }
}

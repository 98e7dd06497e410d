//! Generator error types.

use thiserror::Error;

use crate::ai::GenAiError;
use crate::db::DatabaseError;
use crate::storage::StorageError;

/// Errors from generation operations.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Request has no views to edit")]
    NoViews,

    #[error("Vision analysis failed: {0}")]
    Analysis(#[source] GenAiError),

    #[error("Prompt enhancement failed: {0}")]
    Enhancement(#[source] GenAiError),

    #[error("Synthesis failed for slot '{slot}': {source}")]
    Synthesis {
        slot: String,
        #[source]
        source: GenAiError,
    },

    #[error("Upload failed for slot '{slot}': {source}")]
    Upload {
        slot: String,
        #[source]
        source: StorageError,
    },

    #[error("Estimation call failed: {0}")]
    Estimation(#[source] GenAiError),

    #[error("Estimate response was not valid JSON: {0}")]
    EstimateParse(String),

    #[error("Estimate response failed schema validation: {0}")]
    EstimateSchema(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

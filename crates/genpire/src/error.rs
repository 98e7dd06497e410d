use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenpireError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Provider error: {0}")]
    GenAi(#[from] crate::ai::GenAiError),

    #[error("Generation error: {0}")]
    Generator(#[from] crate::generator::GeneratorError),

    #[error("Revision store error: {0}")]
    Store(#[from] crate::revision::StoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] crate::credits::LedgerError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

pub type Result<T> = std::result::Result<T, GenpireError>;

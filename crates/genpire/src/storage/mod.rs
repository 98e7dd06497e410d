//! Object storage for generated artifacts.
//!
//! The `ObjectStore` trait is the seam the generator writes through; the
//! filesystem implementation backs local deployments and tests. Remote
//! stores plug in behind the same trait.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub mod data_url;
pub mod filesystem;
pub mod thumbnail;

pub use filesystem::FsObjectStore;

/// Errors from artifact storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid object path '{0}'")]
    InvalidPath(String),

    #[error("Malformed data URL: {0}")]
    DataUrl(String),

    #[error("Image processing failed: {0}")]
    Image(String),
}

/// Write-once artifact storage. Uploading the same bytes to two different
/// paths is safe; uploading twice to one path overwrites.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` at `path` and returns the public locator.
    async fn upload(&self, bytes: &[u8], path: &str) -> Result<String, StorageError>;
}

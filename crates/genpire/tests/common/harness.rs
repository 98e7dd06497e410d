//! Test harness for isolated pipeline execution.
//!
//! Assembles an in-memory database, a tempdir-backed object store, and
//! recording fakes for every provider seam.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use genpire::generator::{CostEstimator, EditorOptions, MultiViewEditor};
use genpire::revision::RevisionStore;
use genpire::storage::FsObjectStore;
use genpire::Database;

use super::fakes::{FakeCompletionClient, FakeImageClient};

pub const CDN_BASE: &str = "https://cdn.genpire.test";

/// Isolated environment for one test.
pub struct TestHarness {
    temp_dir: TempDir,
    pub db: Database,
    pub completion: Arc<FakeCompletionClient>,
    pub images: Arc<FakeImageClient>,
    pub objects: Arc<FsObjectStore>,
}

impl TestHarness {
    /// Harness with scripted completion responses and an always-green
    /// image fake.
    pub fn new(completion_responses: Vec<&str>) -> Self {
        Self::with_images(completion_responses, FakeImageClient::new())
    }

    pub fn with_images(completion_responses: Vec<&str>, images: FakeImageClient) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::open_in_memory().expect("Failed to open test database");
        let objects = Arc::new(FsObjectStore::new(temp_dir.path(), CDN_BASE));

        Self {
            temp_dir,
            db,
            completion: Arc::new(FakeCompletionClient::new(completion_responses)),
            images: Arc::new(images),
            objects,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn store(&self) -> RevisionStore {
        RevisionStore::new(self.db.clone())
    }

    pub fn editor(&self) -> MultiViewEditor {
        let completion: Arc<dyn genpire::CompletionClient> = self.completion.clone();
        let images: Arc<dyn genpire::ImageClient> = self.images.clone();
        let objects: Arc<dyn genpire::ObjectStore> = self.objects.clone();
        MultiViewEditor::new(
            completion,
            images,
            objects,
            self.store(),
            EditorOptions::default(),
        )
    }

    pub fn estimator(&self) -> CostEstimator {
        let completion: Arc<dyn genpire::CompletionClient> = self.completion.clone();
        CostEstimator::new(completion, self.db.clone(), "gpt-4o-mini")
    }
}

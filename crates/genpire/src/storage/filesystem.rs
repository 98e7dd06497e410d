//! Filesystem-backed object store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{ObjectStore, StorageError};

/// Stores objects under a root directory and returns URLs under a
/// configured public base.
pub struct FsObjectStore {
    root: PathBuf,
    base_url: String,
}

impl FsObjectStore {
    pub fn new<P: AsRef<Path>>(root: P, base_url: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Object paths are relative and stay inside the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        if path.is_empty()
            || relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn upload(&self, bytes: &[u8], path: &str) -> Result<String, StorageError> {
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| StorageError::WriteFile {
                path: target.clone(),
                source: e,
            })?;

        log::debug!("Stored {} bytes at {}", bytes.len(), target.display());

        Ok(format!("{}/{}", self.base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path(), "https://cdn.test/");

        let url = store
            .upload(b"png-bytes", "edits/p1/front.png")
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.test/edits/p1/front.png");
        let written = std::fs::read(dir.path().join("edits/p1/front.png")).unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn test_upload_twice_same_path_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path(), "https://cdn.test");

        store.upload(b"v1", "a.png").await.unwrap();
        store.upload(b"v2", "a.png").await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_upload_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path(), "https://cdn.test");

        assert!(store.upload(b"x", "../escape.png").await.is_err());
        assert!(store.upload(b"x", "/abs.png").await.is_err());
        assert!(store.upload(b"x", "").await.is_err());
    }
}

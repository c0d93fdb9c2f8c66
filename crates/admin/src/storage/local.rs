//! Local directory media backend.

use std::path::{Path, PathBuf};

use axum::body::Bytes;

use super::{StorageError, StoredObject};

/// Writes uploads under a directory that the router serves at `/media`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
    public_base: String,
}

impl LocalStorage {
    /// `public_base` is prefixed to object keys to form URLs, e.g.
    /// `https://studio.test/media`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, public_base: &str) -> Self {
        Self {
            dir: dir.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub(super) async fn put(&self, path: &str, bytes: Bytes) -> Result<StoredObject, StorageError> {
        let target = self.dir.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;

        Ok(StoredObject {
            url: format!("{}/{path}", self.public_base),
            path: path.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{MediaNamespace, MediaStorage};
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::Local(LocalStorage::new(dir.path(), "/media/"));

        let stored = storage
            .put(MediaNamespace::Team, "image/png", Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap();

        assert!(stored.path.starts_with("team/"));
        assert_eq!(stored.url, format!("/media/{}", stored.path));
        let written = tokio::fs::read(dir.path().join(&stored.path)).await.unwrap();
        assert_eq!(written, b"\x89PNG");
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::Local(LocalStorage::new(dir.path(), "/media"));

        let result = storage
            .put(MediaNamespace::Team, "text/plain", Bytes::from_static(b"hi"))
            .await;

        assert!(matches!(result, Err(StorageError::UnsupportedType(_))));
        assert!(!dir.path().join("team").exists());
    }
}

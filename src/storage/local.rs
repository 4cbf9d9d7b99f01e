//! Local filesystem storage implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::AdvisoryStorage;

/// Storage rooted at the output directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }
}

#[async_trait]
impl AdvisoryStorage for LocalStorage {
    fn path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    async fn exists(&self, name: &str) -> bool {
        tokio::fs::metadata(self.path(name))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    /// Write to a temporary file, then rename into place.
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn remove(&self, name: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_exists;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let path = storage.write("london.201511101500.html", b"<pre>\nVA\n</pre>\n").await.unwrap();
        assert_eq!(path, tmp.path().join("london.201511101500.html"));

        let data = storage.read("london.201511101500.html").await.unwrap();
        assert_eq!(data, Some(b"<pre>\nVA\n</pre>\n".to_vec()));
        assert!(!tmp.path().join("london.201511101500.html.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        assert!(storage.read("nope.html").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_creates_output_dir() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join(".vaac"));

        storage.write("a.html", b"x").await.unwrap();
        assert!(storage.exists("a.html").await);
        assert!(file_exists(storage.root(), "a.html"));
    }

    #[tokio::test]
    async fn test_remove() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write("a.html", b"x").await.unwrap();
        storage.remove("a.html").await.unwrap();
        assert!(!storage.exists("a.html").await);

        // Already gone.
        storage.remove("a.html").await.unwrap();
    }

    #[tokio::test]
    async fn test_directories_do_not_count_as_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("x.kml")).unwrap();

        let storage = LocalStorage::new(tmp.path());
        assert!(!storage.exists("x.kml").await);
        assert!(!file_exists(tmp.path(), "x.kml"));
    }
}

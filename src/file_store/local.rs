use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::path::{Path, PathBuf};

use super::{is_valid_name, stored_name, FileStore, FileStoreError};

/// Photo store backed by the cache directory on local disk.
pub struct LocalFileStore {
    base_path: PathBuf,
}

impl LocalFileStore {
    /// Open the store, creating the directory (and parents) if needed.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn file_path(&self, name: &str) -> Result<PathBuf, FileStoreError> {
        if !is_valid_name(name) {
            return Err(FileStoreError::InvalidName(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, data: Bytes, original_filename: &str) -> Result<String, FileStoreError> {
        let name = stored_name(Utc::now().timestamp_millis(), original_filename);
        let path = self.file_path(&name)?;
        tokio::fs::write(&path, &data).await?;
        tracing::debug!(stored_name = %name, bytes = data.len(), "Stored upload");
        Ok(name)
    }

    async fn retrieve(&self, name: &str) -> Result<Bytes, FileStoreError> {
        let path = self.file_path(name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileStoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, name: &str) -> Result<(), FileStoreError> {
        let path = self.file_path(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

mod local;

pub use local::LocalFileStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Invalid stored name: {0}")]
    InvalidName(String),
}

/// Storage for uploaded photos.
/// Stored names are `<epoch-millis><original-extension>`; two uploads with the
/// same extension in the same millisecond share a name and the later one wins.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `data` and return the name it was stored under.
    async fn store(&self, data: Bytes, original_filename: &str) -> Result<String, FileStoreError>;
    async fn retrieve(&self, name: &str) -> Result<Bytes, FileStoreError>;
    /// Removing a name that is not present is not an error.
    async fn remove(&self, name: &str) -> Result<(), FileStoreError>;
}

/// Build a stored name from a timestamp and the extension of the uploaded file.
pub fn stored_name(epoch_millis: i64, original_filename: &str) -> String {
    let extension = std::path::Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!("{epoch_millis}{extension}")
}

/// Stored names are flat file names inside the cache directory.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

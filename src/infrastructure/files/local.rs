//! Local filesystem adapter

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{FileError, FileInfo, FileStore};

/// Convert a `file://` URI or plain path to a filesystem path
pub fn uri_to_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

/// File store over the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn info(&self, uri: &str) -> Result<FileInfo, FileError> {
        match fs::metadata(uri_to_path(uri)).await {
            Ok(meta) => Ok(FileInfo {
                exists: true,
                size: Some(meta.len()),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FileInfo::default()),
            Err(e) => Err(FileError::InspectFailed {
                uri: uri.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Deleting a file that is already gone succeeds
    async fn delete(&self, uri: &str) -> Result<(), FileError> {
        match fs::remove_file(uri_to_path(uri)).await {
            Ok(()) => {
                debug!(uri, "file deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FileError::DeleteFailed {
                uri: uri.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_to_path_strips_scheme() {
        assert_eq!(uri_to_path("file:///tmp/a.flac"), PathBuf::from("/tmp/a.flac"));
        assert_eq!(uri_to_path("/tmp/a.flac"), PathBuf::from("/tmp/a.flac"));
    }

    #[tokio::test]
    async fn info_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.flac");
        std::fs::write(&path, [0u8; 42]).unwrap();

        let info = LocalFileStore.info(path.to_str().unwrap()).await.unwrap();
        assert_eq!(info, FileInfo { exists: true, size: Some(42) });
    }

    #[tokio::test]
    async fn info_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("file://{}", dir.path().join("nope.flac").display());

        let info = LocalFileStore.info(&uri).await.unwrap();
        assert!(!info.exists);
        assert_eq!(info.size, None);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.flac");
        std::fs::write(&path, b"x").unwrap();
        let uri = path.to_str().unwrap();

        LocalFileStore.delete(uri).await.unwrap();
        assert!(!path.exists());
        LocalFileStore.delete(uri).await.unwrap();
    }
}

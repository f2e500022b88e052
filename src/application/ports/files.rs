//! Filesystem port interface

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum FileError {
    #[error("Failed to inspect {uri}: {message}")]
    InspectFailed { uri: String, message: String },

    #[error("Failed to delete {uri}: {message}")]
    DeleteFailed { uri: String, message: String },
}

/// Metadata for a file referenced by URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileInfo {
    pub exists: bool,
    pub size: Option<u64>,
}

/// Port for inspecting and removing audio files
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn info(&self, uri: &str) -> Result<FileInfo, FileError>;

    async fn delete(&self, uri: &str) -> Result<(), FileError>;
}

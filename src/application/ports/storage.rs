//! Key-value storage port interface

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },
}

/// Port for durable string key-value storage.
/// Each `set_item` replaces the whole value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

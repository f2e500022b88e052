//! File-backed key-value store
//!
//! Each key maps to `<dir>/<name>.json`, where the name is the key without
//! its leading `@`. Writes go to a temp file that is renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{KeyValueStore, StorageError};

pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`, e.g. `@recordings` -> `recordings.json`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .trim_start_matches('@')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_err = |e: std::io::Error| StorageError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.dir).await.map_err(write_err)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await.map_err(write_err)?;
        fs::rename(&tmp, &path).await.map_err(write_err)?;

        debug!(key, path = %path.display(), bytes = value.len(), "stored");
        Ok(())
    }
}

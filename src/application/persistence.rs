//! JSON persistence of the recordings list and settings

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::recording::Recording;
use crate::domain::settings::RecordingSettings;

use super::ports::{KeyValueStore, StorageError};

/// Storage key holding the recordings list
pub const RECORDINGS_KEY: &str = "@recordings";

/// Storage key holding the settings object
pub const SETTINGS_KEY: &str = "@settings";

/// Errors from saving state
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to encode '{key}': {message}")]
    Encode { key: &'static str, message: String },
}

/// Loads and saves whole JSON documents under fixed keys.
///
/// Reads fail open: absence, read errors and parse errors all yield the
/// empty list or default settings. Writes propagate every failure.
pub struct Persistence<S> {
    store: Arc<S>,
}

impl<S> Clone for Persistence<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn load_recordings(&self) -> Vec<Recording> {
        self.load_or_default(RECORDINGS_KEY).await
    }

    pub async fn save_recordings(&self, recordings: &[Recording]) -> Result<(), PersistenceError> {
        self.save(RECORDINGS_KEY, recordings).await
    }

    pub async fn load_settings(&self) -> RecordingSettings {
        self.load_or_default(SETTINGS_KEY).await
    }

    pub async fn save_settings(&self, settings: &RecordingSettings) -> Result<(), PersistenceError> {
        self.save(SETTINGS_KEY, settings).await
    }

    async fn load_or_default<T>(&self, key: &'static str) -> T
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let raw = match self.store.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "nothing stored yet");
                return T::default();
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read stored value, using default");
                return T::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "stored value is not valid JSON, using default");
            T::default()
        })
    }

    async fn save<T>(&self, key: &'static str, value: &T) -> Result<(), PersistenceError>
    where
        T: serde::Serialize + ?Sized,
    {
        let json = serde_json::to_string(value).map_err(|e| PersistenceError::Encode {
            key,
            message: e.to_string(),
        })?;
        self.store.set_item(key, &json).await?;
        Ok(())
    }
}

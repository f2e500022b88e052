//! Recordings collection use case

use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::recording::Recording;

use super::persistence::{Persistence, PersistenceError};
use super::ports::{FileStore, KeyValueStore};

/// Errors from changing the collection
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Failed to save recordings: {0}")]
    Persistence(#[from] PersistenceError),
}

/// In-memory list of saved recordings, newest first.
///
/// Mutations are serialized by an async gate and persist the whole list.
/// Reads are synchronous snapshots.
pub struct RecordingsCollection<S, F>
where
    S: KeyValueStore,
    F: FileStore,
{
    persistence: Persistence<S>,
    files: F,
    recordings: RwLock<Vec<Recording>>,
    gate: Mutex<()>,
}

impl<S, F> RecordingsCollection<S, F>
where
    S: KeyValueStore,
    F: FileStore,
{
    /// Create an empty collection. Call [`load_all`](Self::load_all) to
    /// populate it.
    pub fn new(persistence: Persistence<S>, files: F) -> Self {
        Self {
            persistence,
            files,
            recordings: RwLock::new(Vec::new()),
            gate: Mutex::new(()),
        }
    }

    /// Replace the in-memory list with the persisted one, newest first
    pub async fn load_all(&self) -> Vec<Recording> {
        let _gate = self.gate.lock().await;

        let mut loaded = self.persistence.load_recordings().await;
        loaded.sort_by(|a, b| b.date.cmp(&a.date));
        debug!(count = loaded.len(), "recordings loaded");

        *self.write() = loaded.clone();
        loaded
    }

    /// Prepend `recording` and persist the list.
    ///
    /// The in-memory list keeps the entry even if saving fails.
    pub async fn add(&self, recording: Recording) -> Result<(), CollectionError> {
        let _gate = self.gate.lock().await;

        info!(id = %recording.id, filename = %recording.filename, "adding recording");
        let snapshot = {
            let mut list = self.write();
            list.insert(0, recording);
            list.clone()
        };

        self.persistence.save_recordings(&snapshot).await?;
        Ok(())
    }

    /// Remove the entry with `id` and its audio file.
    ///
    /// File removal is best effort. Returns `false` if no entry matched.
    pub async fn delete(&self, id: &str) -> Result<bool, CollectionError> {
        let _gate = self.gate.lock().await;

        let Some(target) = self.find(id) else {
            debug!(id, "nothing to delete");
            return Ok(false);
        };

        match self.files.info(&target.uri).await {
            Ok(info) if info.exists => {
                if let Err(e) = self.files.delete(&target.uri).await {
                    warn!(id, error = %e, "failed to delete audio file");
                }
            }
            Ok(_) => warn!(id, uri = %target.uri, "audio file already missing"),
            Err(e) => warn!(id, error = %e, "failed to inspect audio file"),
        }

        let snapshot = {
            let mut list = self.write();
            list.retain(|r| r.id != id);
            list.clone()
        };

        self.persistence.save_recordings(&snapshot).await?;
        info!(id, "recording deleted");
        Ok(true)
    }

    /// Entries whose filename or date label contains `query`, ignoring case.
    /// A blank query returns everything; otherwise surrounding spaces count.
    pub fn search(&self, query: &str) -> Vec<Recording> {
        let list = self.read();
        if query.trim().is_empty() {
            return list.clone();
        }
        let needle = query.to_lowercase();
        list.iter().filter(|r| r.matches(&needle)).cloned().collect()
    }

    pub fn recordings(&self) -> Vec<Recording> {
        self.read().clone()
    }

    pub fn find(&self, id: &str) -> Option<Recording> {
        self.read().iter().find(|r| r.id == id).cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Recording>> {
        self.recordings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Recording>> {
        self.recordings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Settings store use case

use crate::domain::settings::{PlaybackSpeed, Quality, RecordingSettings};

use super::persistence::{Persistence, PersistenceError};
use super::ports::KeyValueStore;

/// Reads and updates the persisted [`RecordingSettings`]
pub struct SettingsStore<S> {
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(persistence: Persistence<S>) -> Self {
        Self { persistence }
    }

    /// Current settings, defaults if nothing valid is stored
    pub async fn load(&self) -> RecordingSettings {
        self.persistence.load_settings().await
    }

    pub async fn save(&self, settings: &RecordingSettings) -> Result<(), PersistenceError> {
        self.persistence.save_settings(settings).await
    }

    pub async fn set_quality(&self, quality: Quality) -> Result<RecordingSettings, PersistenceError> {
        let mut settings = self.load().await;
        settings.quality = quality;
        self.save(&settings).await?;
        Ok(settings)
    }

    pub async fn set_playback_speed(
        &self,
        speed: PlaybackSpeed,
    ) -> Result<RecordingSettings, PersistenceError> {
        let mut settings = self.load().await;
        settings.playback_speed = speed;
        self.save(&settings).await?;
        Ok(settings)
    }
}

//! Playback port interfaces

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::playback::EngineStatus;
use crate::domain::settings::PlaybackSpeed;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Audio file not found: {0}")]
    NotFound(String),

    #[error("Failed to load audio: {0}")]
    LoadFailed(String),

    #[error("No audio output device available")]
    NoOutputDevice,

    #[error("Playback failed: {0}")]
    Engine(String),

    #[error("Sound is no longer loaded")]
    Unloaded,
}

/// Callback receiving status updates from a loaded sound.
/// Invoked from the engine's thread.
pub type StatusCallback = Arc<dyn Fn(EngineStatus) + Send + Sync>;

/// Port for loading audio files for playback
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Load a sound, paused at position zero with the given rate.
    async fn load(
        &self,
        uri: &str,
        rate: PlaybackSpeed,
        on_status: StatusCallback,
    ) -> Result<Box<dyn LoadedSound>, PlaybackError>;
}

/// Handle to a loaded sound
#[async_trait]
pub trait LoadedSound: Send + Sync {
    async fn play(&self) -> Result<(), PlaybackError>;

    async fn pause(&self) -> Result<(), PlaybackError>;

    /// Halt and rewind to zero
    async fn stop(&self) -> Result<(), PlaybackError>;

    /// Seek to an absolute position. Out-of-range values are clamped.
    async fn set_position(&self, position_secs: f64) -> Result<(), PlaybackError>;

    /// Change rate without restarting
    async fn set_rate(&self, rate: PlaybackSpeed) -> Result<(), PlaybackError>;

    /// Release the sound. Further calls fail with `Unloaded`.
    async fn unload(&self) -> Result<(), PlaybackError>;
}

//! Microphone capture port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::settings::EncodingPreset;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Failed to stop recording: {0}")]
    StopFailed(String),

    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("No recording in progress")]
    NotCapturing,
}

/// What a finished capture left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Location of the finalized file; `None` if the engine produced nothing
    pub uri: Option<String>,
    /// Engine-reported length in milliseconds
    pub duration_ms: u64,
}

/// Port for recording from the microphone into a file.
///
/// One capture runs at a time: `begin` starts writing, `finish` stops and
/// finalizes the file.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Start capturing with the given encoding parameters.
    async fn begin(&self, preset: EncodingPreset) -> Result<(), CaptureError>;

    /// Stop capturing and finalize the file.
    async fn finish(&self) -> Result<CaptureOutcome, CaptureError>;
}

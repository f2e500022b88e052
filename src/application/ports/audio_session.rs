//! Audio session port interface

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Failed to switch audio mode to {mode}: {message}")]
pub struct AudioSessionError {
    pub mode: AudioMode,
    pub message: String,
}

/// Host audio routing modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioMode {
    #[default]
    Idle,
    /// Input enabled for recording
    Capture,
    /// Output only
    Playback,
}

impl AudioMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capture => "capture",
            Self::Playback => "playback",
        }
    }
}

impl fmt::Display for AudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Port for configuring the host audio session
#[async_trait]
pub trait AudioSession: Send + Sync {
    async fn set_mode(&self, mode: AudioMode) -> Result<(), AudioSessionError>;
}

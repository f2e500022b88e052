//! Host audio session
//!
//! Desktop audio stacks route input and output independently, so switching
//! modes only records the current mode for diagnostics.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{AudioMode, AudioSession, AudioSessionError};

#[derive(Debug, Default)]
pub struct HostAudioSession {
    mode: Mutex<AudioMode>,
}

impl HostAudioSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AudioMode {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AudioSession for HostAudioSession {
    async fn set_mode(&self, mode: AudioMode) -> Result<(), AudioSessionError> {
        let mut current = self.mode.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != mode {
            debug!(from = %*current, to = %mode, "audio mode changed");
            *current = mode;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_mode() {
        let session = HostAudioSession::new();
        assert_eq!(session.mode(), AudioMode::Idle);

        session.set_mode(AudioMode::Capture).await.unwrap();
        assert_eq!(session.mode(), AudioMode::Capture);

        session.set_mode(AudioMode::Idle).await.unwrap();
        assert_eq!(session.mode(), AudioMode::Idle);
    }
}

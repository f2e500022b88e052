//! Microphone permission port interface

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    #[error("Failed to query microphone permission: {0}")]
    QueryFailed(String),
}

/// Outcome of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Port for acquiring access to the microphone
#[async_trait]
pub trait MicrophonePermission: Send + Sync {
    /// Ask for microphone access, prompting the user if the platform does so.
    async fn request(&self) -> Result<PermissionStatus, PermissionError>;
}

//! Microphone permission for desktop hosts
//!
//! Desktop platforms have no runtime permission prompt that cpal can drive,
//! so access counts as granted when a usable input device exists.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::cpal_capture::CpalCapture;
use crate::application::ports::{
    CaptureError, MicrophonePermission, PermissionError, PermissionStatus,
};

pub struct DevicePermission {
    device_name: Option<String>,
}

impl DevicePermission {
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }
}

#[async_trait]
impl MicrophonePermission for DevicePermission {
    async fn request(&self) -> Result<PermissionStatus, PermissionError> {
        let device_name = self.device_name.clone();
        let probe = tokio::task::spawn_blocking(move || {
            CpalCapture::input_device(device_name.as_deref()).map(|_| ())
        })
        .await
        .map_err(|e| PermissionError::QueryFailed(e.to_string()))?;

        match probe {
            Ok(()) => {
                debug!("input device available");
                Ok(PermissionStatus::Granted)
            }
            Err(CaptureError::NoAudioDevice) => {
                warn!("no input device available");
                Ok(PermissionStatus::Denied)
            }
            Err(e) => Err(PermissionError::QueryFailed(e.to_string())),
        }
    }
}

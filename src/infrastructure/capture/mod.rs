//! Microphone capture infrastructure
//!
//! Cross-platform capture with cpal, resampled with rubato and stored as
//! FLAC.

mod cpal_capture;
mod flac_encoder;
mod permission;

pub use cpal_capture::CpalCapture;
pub use flac_encoder::{encode_to_flac, EncodingError};
pub use permission::DevicePermission;

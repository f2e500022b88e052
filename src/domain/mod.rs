//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod playback;
pub mod recording;
pub mod session;
pub mod settings;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use playback::{EngineStatus, PlaybackState};
pub use recording::{default_filename, Duration, Recording, RecordingDescriptor};
pub use session::{InvalidStateTransition, RecordingSession, RecordingSessionState, SessionState};
pub use settings::{EncodingPreset, PlaybackSpeed, Quality, RecordingSettings};

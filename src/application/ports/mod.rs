//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio_session;
pub mod capture;
pub mod config;
pub mod files;
pub mod permission;
pub mod player;
pub mod storage;

// Re-export common types
pub use audio_session::{AudioMode, AudioSession, AudioSessionError};
pub use capture::{AudioCapture, CaptureError, CaptureOutcome};
pub use config::ConfigStore;
pub use files::{FileError, FileInfo, FileStore};
pub use permission::{MicrophonePermission, PermissionError, PermissionStatus};
pub use player::{LoadedSound, PlaybackEngine, PlaybackError, StatusCallback};
pub use storage::{KeyValueStore, StorageError};

//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, rodio, the filesystem and XDG config files.

pub mod audio_session;
pub mod capture;
pub mod config;
pub mod files;
pub mod playback;
pub mod storage;

// Re-export adapters
pub use audio_session::HostAudioSession;
pub use capture::{CpalCapture, DevicePermission};
pub use config::XdgConfigStore;
pub use files::LocalFileStore;
pub use playback::RodioEngine;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};

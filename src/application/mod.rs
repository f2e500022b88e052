//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod persistence;
pub mod player;
pub mod ports;
pub mod recorder;
pub mod recordings;
pub mod settings;

// Re-export use cases
pub use persistence::{Persistence, PersistenceError, RECORDINGS_KEY, SETTINGS_KEY};
pub use player::{PlaybackController, PlayerError};
pub use recorder::{RecorderError, RecordingSessionManager};
pub use recordings::{CollectionError, RecordingsCollection};
pub use settings::SettingsStore;

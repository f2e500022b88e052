//! Recording session domain types

mod state;

pub use state::{InvalidStateTransition, RecordingSession, RecordingSessionState, SessionState};

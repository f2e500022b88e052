//! Recording session state machine

use std::fmt;
use thiserror::Error;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Snapshot published to observers while a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordingSessionState {
    pub is_recording: bool,
    pub elapsed_seconds: u64,
}

/// Recording session entity.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> IDLE (finish, keeps the audio)
///   RECORDING -> IDLE (cancel, discards the audio)
///
/// Elapsed seconds count up while recording and drop back to zero when the
/// session ends.
#[derive(Debug, Default)]
pub struct RecordingSession {
    state: SessionState,
    elapsed_seconds: u64,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn snapshot(&self) -> RecordingSessionState {
        RecordingSessionState {
            is_recording: self.is_recording(),
            elapsed_seconds: self.elapsed_seconds,
        }
    }

    /// Transition from IDLE to RECORDING
    pub fn start(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "start recording".to_string(),
            });
        }
        self.state = SessionState::Recording;
        self.elapsed_seconds = 0;
        Ok(())
    }

    /// Advance the elapsed counter by one second. Ignored when idle.
    pub fn tick(&mut self) -> u64 {
        if self.is_recording() {
            self.elapsed_seconds += 1;
        }
        self.elapsed_seconds
    }

    /// Transition from RECORDING to IDLE, keeping the capture
    pub fn finish(&mut self) -> Result<(), InvalidStateTransition> {
        self.end("stop recording")
    }

    /// Transition from RECORDING to IDLE, discarding the capture
    pub fn cancel(&mut self) -> Result<(), InvalidStateTransition> {
        self.end("cancel recording")
    }

    fn end(&mut self, action: &str) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Recording {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: action.to_string(),
            });
        }
        self.state = SessionState::Idle;
        self.elapsed_seconds = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = RecordingSession::new();
        assert!(session.is_idle());
        assert!(!session.is_recording());
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn start_from_idle() {
        let mut session = RecordingSession::new();
        assert!(session.start().is_ok());
        assert!(session.is_recording());
    }

    #[test]
    fn start_while_recording_fails() {
        let mut session = RecordingSession::new();
        session.start().unwrap();

        let err = session.start().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn finish_from_idle_fails() {
        let mut session = RecordingSession::new();
        let err = session.finish().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn cancel_from_idle_fails() {
        let mut session = RecordingSession::new();
        let err = session.cancel().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn tick_counts_only_while_recording() {
        let mut session = RecordingSession::new();
        assert_eq!(session.tick(), 0);

        session.start().unwrap();
        session.tick();
        session.tick();
        assert_eq!(session.tick(), 3);

        session.finish().unwrap();
        assert_eq!(session.tick(), 0);
    }

    #[test]
    fn ending_resets_elapsed() {
        let mut session = RecordingSession::new();
        session.start().unwrap();
        session.tick();
        session.cancel().unwrap();

        assert_eq!(
            session.snapshot(),
            RecordingSessionState {
                is_recording: false,
                elapsed_seconds: 0
            }
        );
    }

    #[test]
    fn restart_resets_elapsed() {
        let mut session = RecordingSession::new();
        session.start().unwrap();
        session.tick();
        session.cancel().unwrap();

        session.start().unwrap();
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(
            session.snapshot(),
            RecordingSessionState {
                is_recording: true,
                elapsed_seconds: 0
            }
        );
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Recording,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("recording state"));
    }
}

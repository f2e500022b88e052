//! Playback state value objects

/// Observable state of the loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
}

/// Status update pushed by a playback engine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineStatus {
    pub is_loaded: bool,
    pub is_playing: bool,
    pub position_secs: f64,
    /// Unknown until the engine has probed the stream
    pub duration_secs: Option<f64>,
    /// Set once when the sound reached its end on its own
    pub did_just_finish: bool,
}

impl PlaybackState {
    /// Fold an engine status update into this state.
    ///
    /// Updates from an unloaded sound are ignored. A natural finish
    /// rewinds the position to zero and clears `is_playing`.
    pub fn apply(&mut self, status: &EngineStatus) {
        if !status.is_loaded {
            return;
        }

        self.is_playing = status.is_playing;
        self.position_secs = status.position_secs;
        if let Some(duration) = status.duration_secs {
            self.duration_secs = duration;
        }

        if status.did_just_finish {
            self.is_playing = false;
            self.position_secs = 0.0;
        }
    }

    /// Fraction of the sound played, in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(is_playing: bool, position: f64) -> EngineStatus {
        EngineStatus {
            is_loaded: true,
            is_playing,
            position_secs: position,
            duration_secs: Some(10.0),
            did_just_finish: false,
        }
    }

    #[test]
    fn apply_mirrors_loaded_status() {
        let mut state = PlaybackState::default();
        state.apply(&loaded(true, 2.5));
        assert!(state.is_playing);
        assert_eq!(state.position_secs, 2.5);
        assert_eq!(state.duration_secs, 10.0);
    }

    #[test]
    fn apply_ignores_unloaded_status() {
        let mut state = PlaybackState::default();
        state.apply(&loaded(true, 2.5));
        state.apply(&EngineStatus::default());
        assert!(state.is_playing);
        assert_eq!(state.position_secs, 2.5);
    }

    #[test]
    fn apply_keeps_duration_when_unknown() {
        let mut state = PlaybackState::default();
        state.apply(&loaded(false, 0.0));
        state.apply(&EngineStatus {
            duration_secs: None,
            ..loaded(true, 1.0)
        });
        assert_eq!(state.duration_secs, 10.0);
    }

    #[test]
    fn finish_rewinds() {
        let mut state = PlaybackState::default();
        state.apply(&EngineStatus {
            did_just_finish: true,
            ..loaded(true, 10.0)
        });
        assert!(!state.is_playing);
        assert_eq!(state.position_secs, 0.0);
    }

    #[test]
    fn progress_is_clamped() {
        let state = PlaybackState {
            is_playing: true,
            position_secs: 12.0,
            duration_secs: 10.0,
        };
        assert_eq!(state.progress(), 1.0);
        assert_eq!(PlaybackState::default().progress(), 0.0);
    }
}

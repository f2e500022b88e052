//! Playback controller use case

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::domain::playback::{EngineStatus, PlaybackState};
use crate::domain::settings::PlaybackSpeed;

use super::ports::{
    AudioMode, AudioSession, AudioSessionError, LoadedSound, PlaybackEngine, PlaybackError,
    StatusCallback,
};

/// Errors from loading audio
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Audio session failed: {0}")]
    AudioSession(#[from] AudioSessionError),

    #[error("{0}")]
    Playback(#[from] PlaybackError),
}

struct Inner {
    sound: Option<Box<dyn LoadedSound>>,
    uri: Option<String>,
    rate: PlaybackSpeed,
}

/// Owns at most one loaded sound and mirrors its status.
///
/// Only `load_audio` reports errors. Transport calls log failures and carry
/// on, and are no-ops while nothing is loaded.
pub struct PlaybackController<E, A>
where
    E: PlaybackEngine,
    A: AudioSession,
{
    engine: E,
    audio: A,
    inner: Mutex<Inner>,
    state_tx: Arc<watch::Sender<PlaybackState>>,
    // Bumped on every load/unload so late callbacks from an old sound are dropped
    generation: Arc<AtomicU64>,
}

impl<E, A> PlaybackController<E, A>
where
    E: PlaybackEngine,
    A: AudioSession,
{
    pub fn new(engine: E, audio: A, rate: PlaybackSpeed) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::default());
        Self {
            engine,
            audio,
            inner: Mutex::new(Inner {
                sound: None,
                uri: None,
                rate,
            }),
            state_tx: Arc::new(state_tx),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> PlaybackState {
        *self.state_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    pub async fn current_uri(&self) -> Option<String> {
        self.inner.lock().await.uri.clone()
    }

    /// Load `uri` paused at position zero, replacing any other sound.
    /// Loading the URI that is already loaded does nothing.
    pub async fn load_audio(&self, uri: &str) -> Result<(), PlayerError> {
        let mut inner = self.inner.lock().await;
        if inner.sound.is_some() && inner.uri.as_deref() == Some(uri) {
            debug!(uri, "already loaded");
            return Ok(());
        }

        self.unload_current(&mut inner).await;

        if let Err(e) = self.audio.set_mode(AudioMode::Playback).await {
            warn!(error = %e, "failed to switch to playback mode");
            return Err(e.into());
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let sound = self
            .engine
            .load(uri, inner.rate, self.status_callback(generation))
            .await
            .map_err(|e| {
                warn!(uri, error = %e, "failed to load audio");
                e
            })?;

        info!(uri, rate = inner.rate.value(), "audio loaded");
        inner.sound = Some(sound);
        inner.uri = Some(uri.to_string());
        Ok(())
    }

    /// Toggle between playing and paused
    pub async fn play_pause(&self) {
        let inner = self.inner.lock().await;
        let Some(sound) = inner.sound.as_ref() else {
            return;
        };

        let result = if self.state().is_playing {
            sound.pause().await
        } else {
            sound.play().await
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to toggle playback");
        }
    }

    /// Jump to `position_secs`. Negative or non-finite positions seek to zero.
    pub async fn seek(&self, position_secs: f64) {
        let inner = self.inner.lock().await;
        let Some(sound) = inner.sound.as_ref() else {
            return;
        };

        let position = if position_secs.is_finite() && position_secs > 0.0 {
            position_secs
        } else {
            0.0
        };
        if let Err(e) = sound.set_position(position).await {
            warn!(position, error = %e, "failed to seek");
        }
    }

    /// Use `rate` from now on, including for the loaded sound
    pub async fn set_playback_rate(&self, rate: PlaybackSpeed) {
        let mut inner = self.inner.lock().await;
        inner.rate = rate;
        if let Some(sound) = inner.sound.as_ref() {
            if let Err(e) = sound.set_rate(rate).await {
                warn!(rate = rate.value(), error = %e, "failed to change playback rate");
            }
        }
    }

    /// Halt and rewind
    pub async fn stop(&self) {
        let inner = self.inner.lock().await;
        if let Some(sound) = inner.sound.as_ref() {
            if let Err(e) = sound.stop().await {
                warn!(error = %e, "failed to stop playback");
            }
        }
    }

    /// Unload the current sound, if any
    pub async fn release(&self) {
        let mut inner = self.inner.lock().await;
        self.unload_current(&mut inner).await;
    }

    async fn unload_current(&self, inner: &mut Inner) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(sound) = inner.sound.take() {
            if let Err(e) = sound.unload().await {
                warn!(error = %e, "failed to unload previous sound");
            }
        }
        inner.uri = None;
        self.state_tx.send_replace(PlaybackState::default());
    }

    fn status_callback(&self, generation: u64) -> StatusCallback {
        let state_tx = Arc::clone(&self.state_tx);
        let current = Arc::clone(&self.generation);
        Arc::new(move |status: EngineStatus| {
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            state_tx.send_modify(|state| state.apply(&status));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    type CallLog = Arc<StdMutex<Vec<String>>>;

    struct MockSound {
        uri: String,
        log: CallLog,
        on_status: StatusCallback,
        fail: bool,
    }

    impl MockSound {
        fn record(&self, call: String) -> Result<(), PlaybackError> {
            self.log.lock().unwrap().push(format!("{}:{}", self.uri, call));
            if self.fail {
                Err(PlaybackError::Engine("boom".to_string()))
            } else {
                Ok(())
            }
        }

        fn push(&self, is_playing: bool, position_secs: f64) {
            (self.on_status)(EngineStatus {
                is_loaded: true,
                is_playing,
                position_secs,
                duration_secs: Some(30.0),
                did_just_finish: false,
            });
        }
    }

    #[async_trait]
    impl LoadedSound for MockSound {
        async fn play(&self) -> Result<(), PlaybackError> {
            self.record("play".into())?;
            self.push(true, 0.0);
            Ok(())
        }

        async fn pause(&self) -> Result<(), PlaybackError> {
            self.record("pause".into())?;
            self.push(false, 0.0);
            Ok(())
        }

        async fn stop(&self) -> Result<(), PlaybackError> {
            self.record("stop".into())?;
            self.push(false, 0.0);
            Ok(())
        }

        async fn set_position(&self, position_secs: f64) -> Result<(), PlaybackError> {
            self.record(format!("seek {position_secs}"))
        }

        async fn set_rate(&self, rate: PlaybackSpeed) -> Result<(), PlaybackError> {
            self.record(format!("rate {}", rate.value()))
        }

        async fn unload(&self) -> Result<(), PlaybackError> {
            self.record("unload".into())
        }
    }

    #[derive(Clone, Default)]
    struct MockEngine {
        log: CallLog,
        callbacks: Arc<StdMutex<Vec<StatusCallback>>>,
        fail_sounds: bool,
    }

    #[async_trait]
    impl PlaybackEngine for MockEngine {
        async fn load(
            &self,
            uri: &str,
            rate: PlaybackSpeed,
            on_status: StatusCallback,
        ) -> Result<Box<dyn LoadedSound>, PlaybackError> {
            if uri.contains("missing") {
                return Err(PlaybackError::NotFound(uri.to_string()));
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("{uri}:load {}", rate.value()));
            self.callbacks.lock().unwrap().push(Arc::clone(&on_status));
            Ok(Box::new(MockSound {
                uri: uri.to_string(),
                log: Arc::clone(&self.log),
                on_status,
                fail: self.fail_sounds,
            }))
        }
    }

    #[derive(Clone, Default)]
    struct MockAudioSession {
        modes: Arc<StdMutex<Vec<AudioMode>>>,
    }

    #[async_trait]
    impl AudioSession for MockAudioSession {
        async fn set_mode(&self, mode: AudioMode) -> Result<(), AudioSessionError> {
            self.modes.lock().unwrap().push(mode);
            Ok(())
        }
    }

    fn controller(engine: MockEngine) -> PlaybackController<MockEngine, MockAudioSession> {
        PlaybackController::new(engine, MockAudioSession::default(), PlaybackSpeed::NORMAL)
    }

    fn calls(engine: &MockEngine) -> Vec<String> {
        engine.log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn load_sets_uri_and_rate() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());
        player
            .set_playback_rate(PlaybackSpeed::try_from(1.5).unwrap())
            .await;

        player.load_audio("a.flac").await.unwrap();

        assert_eq!(player.current_uri().await.as_deref(), Some("a.flac"));
        assert_eq!(calls(&engine), vec!["a.flac:load 1.5"]);
        assert!(!player.state().is_playing);
    }

    #[tokio::test]
    async fn loading_same_uri_is_noop() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());

        player.load_audio("a.flac").await.unwrap();
        player.load_audio("a.flac").await.unwrap();

        assert_eq!(calls(&engine), vec!["a.flac:load 1"]);
    }

    #[tokio::test]
    async fn loading_other_uri_unloads_first() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());

        player.load_audio("a.flac").await.unwrap();
        player.load_audio("b.flac").await.unwrap();

        assert_eq!(
            calls(&engine),
            vec!["a.flac:load 1", "a.flac:unload", "b.flac:load 1"]
        );
        assert_eq!(player.current_uri().await.as_deref(), Some("b.flac"));
    }

    #[tokio::test]
    async fn load_failure_propagates_and_leaves_nothing_loaded() {
        let player = controller(MockEngine::default());
        let result = player.load_audio("missing.flac").await;

        assert!(matches!(
            result,
            Err(PlayerError::Playback(PlaybackError::NotFound(_)))
        ));
        assert!(player.current_uri().await.is_none());
    }

    #[tokio::test]
    async fn transport_without_sound_is_noop() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());

        player.play_pause().await;
        player.seek(3.0).await;
        player.stop().await;

        assert!(calls(&engine).is_empty());
        assert_eq!(player.state(), PlaybackState::default());
    }

    #[tokio::test]
    async fn play_pause_toggles() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());
        player.load_audio("a.flac").await.unwrap();

        player.play_pause().await;
        assert!(player.state().is_playing);
        assert_eq!(player.state().duration_secs, 30.0);

        player.play_pause().await;
        assert!(!player.state().is_playing);

        assert_eq!(
            calls(&engine),
            vec!["a.flac:load 1", "a.flac:play", "a.flac:pause"]
        );
    }

    #[tokio::test]
    async fn seek_sanitizes_position() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());
        player.load_audio("a.flac").await.unwrap();

        player.seek(-4.0).await;
        player.seek(f64::NAN).await;
        player.seek(12.5).await;

        assert_eq!(
            calls(&engine)[1..],
            ["a.flac:seek 0", "a.flac:seek 0", "a.flac:seek 12.5"]
        );
    }

    #[tokio::test]
    async fn rate_change_applies_to_loaded_sound() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());
        player.load_audio("a.flac").await.unwrap();

        player
            .set_playback_rate(PlaybackSpeed::try_from(2.0).unwrap())
            .await;

        assert_eq!(calls(&engine).last().unwrap(), "a.flac:rate 2");
    }

    #[tokio::test]
    async fn sound_errors_are_swallowed() {
        let engine = MockEngine {
            fail_sounds: true,
            ..Default::default()
        };
        let player = controller(engine.clone());
        player.load_audio("a.flac").await.unwrap();

        player.play_pause().await;
        player.seek(1.0).await;
        player.stop().await;
        player.release().await;

        assert!(player.current_uri().await.is_none());
    }

    #[tokio::test]
    async fn natural_finish_rewinds_state() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());
        player.load_audio("a.flac").await.unwrap();
        player.play_pause().await;

        let callback = Arc::clone(&engine.callbacks.lock().unwrap()[0]);
        callback(EngineStatus {
            is_loaded: true,
            is_playing: false,
            position_secs: 30.0,
            duration_secs: Some(30.0),
            did_just_finish: true,
        });

        let state = player.state();
        assert!(!state.is_playing);
        assert_eq!(state.position_secs, 0.0);
    }

    #[tokio::test]
    async fn stale_callbacks_are_ignored() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());
        player.load_audio("a.flac").await.unwrap();
        player.load_audio("b.flac").await.unwrap();

        let stale = Arc::clone(&engine.callbacks.lock().unwrap()[0]);
        stale(EngineStatus {
            is_loaded: true,
            is_playing: true,
            position_secs: 9.0,
            duration_secs: Some(99.0),
            did_just_finish: false,
        });

        assert_eq!(player.state(), PlaybackState::default());
    }

    #[tokio::test]
    async fn release_unloads() {
        let engine = MockEngine::default();
        let player = controller(engine.clone());
        player.load_audio("a.flac").await.unwrap();

        player.release().await;

        assert!(player.current_uri().await.is_none());
        assert_eq!(calls(&engine).last().unwrap(), "a.flac:unload");
    }
}

//! Recording session manager use case

use std::sync::Arc;
use std::time::Duration as StdDuration;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::domain::recording::{Duration, RecordingDescriptor};
use crate::domain::session::{InvalidStateTransition, RecordingSession, RecordingSessionState};
use crate::domain::settings::{EncodingPreset, Quality};

use super::ports::{
    AudioCapture, AudioMode, AudioSession, AudioSessionError, CaptureError, FileStore,
    MicrophonePermission, PermissionError,
};

/// Errors from the recording session manager
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Microphone permission is required to record audio")]
    PermissionDenied,

    #[error("Permission check failed: {0}")]
    Permission(#[from] PermissionError),

    #[error("Invalid state transition: {0}")]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Audio session failed: {0}")]
    AudioSession(#[from] AudioSessionError),

    #[error("Recording failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Recording produced no audio file")]
    MissingUri,
}

struct Inner {
    session: RecordingSession,
    ticker: Option<JoinHandle<()>>,
    quality: Quality,
}

impl Inner {
    fn halt_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

/// Owns the lifecycle of a single in-progress recording.
///
/// State machine:
///   IDLE -> RECORDING (start_recording)
///   RECORDING -> IDLE (stop_recording, yields a descriptor)
///   RECORDING -> IDLE (cancel_recording, deletes the file)
///
/// While recording, a one-second ticker bumps the elapsed counter and
/// publishes a [`RecordingSessionState`] to subscribers.
pub struct RecordingSessionManager<C, P, F, A>
where
    C: AudioCapture,
    P: MicrophonePermission,
    F: FileStore,
    A: AudioSession,
{
    capture: C,
    permission: P,
    files: F,
    audio: A,
    inner: Arc<Mutex<Inner>>,
    state_tx: Arc<watch::Sender<RecordingSessionState>>,
}

impl<C, P, F, A> RecordingSessionManager<C, P, F, A>
where
    C: AudioCapture,
    P: MicrophonePermission,
    F: FileStore,
    A: AudioSession,
{
    /// Create a new manager in idle state recording at `quality`
    pub fn new(capture: C, permission: P, files: F, audio: A, quality: Quality) -> Self {
        let (state_tx, _) = watch::channel(RecordingSessionState::default());
        Self {
            capture,
            permission,
            files,
            audio,
            inner: Arc::new(Mutex::new(Inner {
                session: RecordingSession::new(),
                ticker: None,
                quality,
            })),
            state_tx: Arc::new(state_tx),
        }
    }

    /// Latest published snapshot
    pub fn state(&self) -> RecordingSessionState {
        *self.state_tx.borrow()
    }

    pub fn is_recording(&self) -> bool {
        self.state().is_recording
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.state().elapsed_seconds
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<RecordingSessionState> {
        self.state_tx.subscribe()
    }

    /// Quality used by the next `start_recording`
    pub async fn set_quality(&self, quality: Quality) {
        self.inner.lock().await.quality = quality;
    }

    /// Start a new recording.
    ///
    /// Fails without touching any state when permission is denied or a
    /// session is already active. A capture that fails to start leaves the
    /// manager idle with the audio mode restored.
    pub async fn start_recording(&self) -> Result<(), RecorderError> {
        let status = self.permission.request().await?;
        if !status.is_granted() {
            warn!("microphone permission denied");
            return Err(RecorderError::PermissionDenied);
        }

        let mut inner = self.inner.lock().await;
        inner.session.start()?;

        let preset = inner.quality.preset();
        if let Err(e) = self.begin_capture(preset).await {
            let _ = inner.session.cancel();
            return Err(e);
        }

        info!(quality = %inner.quality, sample_rate = preset.sample_rate, "recording started");
        inner.ticker = Some(self.spawn_ticker());
        self.state_tx.send_replace(inner.session.snapshot());
        Ok(())
    }

    /// Stop the active recording and describe the saved file.
    ///
    /// Returns `Ok(None)` when idle. The session is cleared even when
    /// finalizing fails.
    pub async fn stop_recording(&self) -> Result<Option<RecordingDescriptor>, RecorderError> {
        let mut inner = self.inner.lock().await;
        if !inner.session.is_recording() {
            return Ok(None);
        }

        inner.halt_ticker();
        inner.session.finish()?;
        self.state_tx.send_replace(inner.session.snapshot());

        let finished = self.capture.finish().await;
        self.restore_idle_mode().await;
        let outcome = finished?;

        let uri = outcome.uri.ok_or(RecorderError::MissingUri)?;
        let size = match self.files.info(&uri).await {
            Ok(info) if info.exists => info.size,
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "could not read recording size");
                None
            }
        };
        let duration = Duration::from_millis(outcome.duration_ms);

        info!(%uri, seconds = duration.as_secs(), "recording stopped");
        Ok(Some(RecordingDescriptor {
            uri,
            duration,
            size,
        }))
    }

    /// Discard the active recording. Never fails; problems are logged.
    pub async fn cancel_recording(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.session.is_recording() {
            return;
        }

        inner.halt_ticker();
        let _ = inner.session.cancel();
        self.state_tx.send_replace(inner.session.snapshot());

        let finished = self.capture.finish().await;
        self.restore_idle_mode().await;

        let uri = match finished {
            Ok(outcome) => outcome.uri,
            Err(e) => {
                warn!(error = %e, "failed to stop cancelled recording");
                None
            }
        };

        if let Some(uri) = uri {
            match self.files.info(&uri).await {
                Ok(info) if info.exists => {
                    if let Err(e) = self.files.delete(&uri).await {
                        warn!(error = %e, "failed to delete cancelled recording");
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "failed to inspect cancelled recording"),
            }
        }

        info!("recording cancelled");
    }

    async fn begin_capture(&self, preset: EncodingPreset) -> Result<(), RecorderError> {
        self.audio.set_mode(AudioMode::Capture).await?;
        if let Err(e) = self.capture.begin(preset).await {
            self.restore_idle_mode().await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn restore_idle_mode(&self) {
        if let Err(e) = self.audio.set_mode(AudioMode::Idle).await {
            warn!(error = %e, "failed to restore idle audio mode");
        }
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let state_tx = Arc::clone(&self.state_tx);
        let period = StdDuration::from_secs(1);

        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let mut guard = inner.lock().await;
                if !guard.session.is_recording() {
                    break;
                }
                let elapsed = guard.session.tick();
                debug!(elapsed, "recording tick");
                state_tx.send_replace(guard.session.snapshot());
            }
        })
    }
}

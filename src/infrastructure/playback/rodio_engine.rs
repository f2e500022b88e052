//! Rodio playback adapter
//!
//! Each loaded sound gets its own thread owning the output stream and sink
//! (`rodio::OutputStream` is not `Send`). The handle talks to it over a
//! channel, and the thread reports status every 100ms.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink, Source};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{LoadedSound, PlaybackEngine, PlaybackError, StatusCallback};
use crate::domain::playback::EngineStatus;
use crate::domain::settings::PlaybackSpeed;
use crate::infrastructure::files::uri_to_path;

/// Status report interval
const TICK: Duration = Duration::from_millis(100);

enum Command {
    Play,
    Pause,
    Stop,
    Seek(f64),
    Rate(f32),
    Unload,
}

struct Request {
    command: Command,
    reply: oneshot::Sender<Result<(), PlaybackError>>,
}

/// Playback engine using rodio
#[derive(Debug, Clone, Copy, Default)]
pub struct RodioEngine;

impl RodioEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlaybackEngine for RodioEngine {
    async fn load(
        &self,
        uri: &str,
        rate: PlaybackSpeed,
        on_status: StatusCallback,
    ) -> Result<Box<dyn LoadedSound>, PlaybackError> {
        let path = uri_to_path(uri);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(PlaybackError::NotFound(uri.to_string()));
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let (requests_tx, requests_rx) = mpsc::channel();

        std::thread::spawn(move || {
            run_player(path, rate.value(), on_status, ready_tx, requests_rx)
        });

        ready_rx
            .await
            .unwrap_or_else(|_| Err(PlaybackError::LoadFailed("Player thread exited".into())))?;

        Ok(Box::new(RodioSound {
            requests: requests_tx,
        }))
    }
}

/// Handle to a sound owned by a player thread
pub struct RodioSound {
    requests: mpsc::Sender<Request>,
}

impl RodioSound {
    async fn send(&self, command: Command) -> Result<(), PlaybackError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request { command, reply })
            .map_err(|_| PlaybackError::Unloaded)?;
        response.await.map_err(|_| PlaybackError::Unloaded)?
    }
}

#[async_trait]
impl LoadedSound for RodioSound {
    async fn play(&self) -> Result<(), PlaybackError> {
        self.send(Command::Play).await
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        self.send(Command::Pause).await
    }

    async fn stop(&self) -> Result<(), PlaybackError> {
        self.send(Command::Stop).await
    }

    async fn set_position(&self, position_secs: f64) -> Result<(), PlaybackError> {
        self.send(Command::Seek(position_secs)).await
    }

    async fn set_rate(&self, rate: PlaybackSpeed) -> Result<(), PlaybackError> {
        self.send(Command::Rate(rate.value())).await
    }

    async fn unload(&self) -> Result<(), PlaybackError> {
        self.send(Command::Unload).await
    }
}

/// Decode `path` and queue it on `sink`. Returns the duration if known.
fn append_source(sink: &Sink, path: &Path) -> Result<Option<f64>, PlaybackError> {
    let file = File::open(path)
        .map_err(|e| PlaybackError::LoadFailed(format!("{}: {}", path.display(), e)))?;
    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| PlaybackError::LoadFailed(format!("{}: {}", path.display(), e)))?;
    let duration = source.total_duration().map(|d| d.as_secs_f64());
    sink.append(source);
    Ok(duration)
}

fn apply(sink: &Sink, command: Command, duration: Option<f64>) -> Result<(), PlaybackError> {
    match command {
        Command::Play => sink.play(),
        Command::Pause => sink.pause(),
        Command::Stop => {
            sink.pause();
            sink.try_seek(Duration::ZERO)
                .map_err(|e| PlaybackError::Engine(e.to_string()))?;
        }
        Command::Seek(position) => {
            let target = duration.map_or(position, |d| position.min(d));
            sink.try_seek(Duration::from_secs_f64(target.max(0.0)))
                .map_err(|e| PlaybackError::Engine(e.to_string()))?;
        }
        Command::Rate(rate) => sink.set_speed(rate),
        Command::Unload => {}
    }
    Ok(())
}

fn run_player(
    path: PathBuf,
    rate: f32,
    on_status: StatusCallback,
    ready: oneshot::Sender<Result<(), PlaybackError>>,
    requests: mpsc::Receiver<Request>,
) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            debug!(error = %e, "no output stream");
            let _ = ready.send(Err(PlaybackError::NoOutputDevice));
            return;
        }
    };

    let sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::LoadFailed(e.to_string())));
            return;
        }
    };

    sink.pause();
    sink.set_speed(rate);
    let duration = match append_source(&sink, &path) {
        Ok(duration) => duration,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    let mut was_playing = false;
    loop {
        match requests.recv_timeout(TICK) {
            Ok(Request {
                command: Command::Unload,
                reply,
            }) => {
                let _ = reply.send(Ok(()));
                break;
            }
            Ok(Request { command, reply }) => {
                let _ = reply.send(apply(&sink, command, duration));
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        // Reached the end: queue the file again, paused at zero
        let finished = sink.empty();
        if finished {
            sink.pause();
            if let Err(e) = append_source(&sink, &path) {
                warn!(error = %e, "failed to rewind finished sound");
                break;
            }
        }

        let is_playing = !finished && !sink.is_paused();
        on_status(EngineStatus {
            is_loaded: true,
            is_playing,
            position_secs: if finished {
                0.0
            } else {
                sink.get_pos().as_secs_f64()
            },
            duration_secs: duration,
            did_just_finish: finished && was_playing,
        });
        was_playing = is_playing;
    }

    sink.stop();
    on_status(EngineStatus::default());
    debug!(path = %path.display(), "sound unloaded");
}

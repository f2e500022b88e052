//! Record command handler

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::RecordingSessionManager;
use crate::domain::config::AppConfig;
use crate::domain::recording::{default_filename, Duration, Recording};
use crate::infrastructure::{CpalCapture, DevicePermission, HostAudioSession, LocalFileStore};

use super::app::{CommandError, Library};
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

type Recorder =
    RecordingSessionManager<CpalCapture, DevicePermission, LocalFileStore, HostAudioSession>;

/// How an interactive recording ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Save,
    Cancel,
}

/// Typed line to outcome: `c` cancels, anything else saves
fn outcome_for(line: &str) -> Outcome {
    if line.trim().eq_ignore_ascii_case("c") {
        Outcome::Cancel
    } else {
        Outcome::Save
    }
}

/// Validate a name given on the command line before any audio is captured
fn requested_name(name: Option<String>) -> Result<Option<String>, CommandError> {
    match name {
        Some(n) if n.trim().is_empty() => {
            Err(CommandError::Usage("Please enter a filename".to_string()))
        }
        other => Ok(other),
    }
}

/// Record until Enter, cancel or the time limit, then save to the library
pub async fn handle_record_command(
    library: &Library,
    config: &AppConfig,
    name: Option<String>,
    max_duration: Option<String>,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let name = requested_name(name)?;
    let limit = match max_duration {
        Some(raw) => raw
            .parse::<Duration>()
            .map_err(|e| CommandError::Usage(format!("Invalid max-duration: {}", e)))?,
        None => config.max_duration_or_default(),
    };

    let settings = library.settings.load().await;
    library.recordings.load_all().await;

    let manager: Recorder = RecordingSessionManager::new(
        CpalCapture::new(library.recordings_dir(), config.input_device.clone()),
        DevicePermission::new(config.input_device.clone()),
        LocalFileStore::new(),
        HostAudioSession::new(),
        settings.quality,
    );

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    manager.start_recording().await?;
    presenter.show_recording(limit);

    let mut state = manager.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let outcome = loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break Outcome::Save;
                }
                let elapsed = Duration::from_secs(state.borrow_and_update().elapsed_seconds);
                presenter.update_recording(elapsed, limit);
                if elapsed >= limit {
                    presenter.stop_spinner();
                    presenter.info("Max duration reached");
                    break Outcome::Save;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => break outcome_for(&line),
                    // Without a terminal, keep recording until the limit or Ctrl+C
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        manager.cancel_recording().await;
                        presenter.stop_spinner();
                        return Err(e.into());
                    }
                }
            }
            _ = shutdown.wait() => break Outcome::Cancel,
        }
    };
    presenter.stop_spinner();

    match outcome {
        Outcome::Cancel => {
            manager.cancel_recording().await;
            presenter.warn("Recording cancelled");
            Ok(())
        }
        Outcome::Save => save(library, &manager, name, presenter).await,
    }
}

async fn save(
    library: &Library,
    manager: &Recorder,
    name: Option<String>,
    presenter: &Presenter,
) -> Result<(), CommandError> {
    let Some(descriptor) = manager.stop_recording().await? else {
        presenter.warn("Nothing was recording");
        return Ok(());
    };

    let now = Local::now();
    let filename = name.unwrap_or_else(|| default_filename(now));
    let recording = Recording::new(descriptor, &filename, now)?;
    let summary = format!(
        "Saved \"{}\" ({}, {})",
        recording.filename,
        recording.duration_label(),
        recording.size_label()
    );

    library.recordings.add(recording).await?;
    presenter.success(&summary);
    Ok(())
}

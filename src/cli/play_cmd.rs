//! Play command handler

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::PlaybackController;
use crate::domain::playback::PlaybackState;
use crate::domain::settings::PlaybackSpeed;
use crate::infrastructure::{HostAudioSession, RodioEngine};

use super::app::{CommandError, Library};
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

const CONTROLS_HELP: &str = "Controls: p (play/pause), s SECS (seek), r RATE (speed), q (quit)";

/// Interactive playback control typed on stdin
#[derive(Debug, Clone, Copy, PartialEq)]
enum Control {
    Toggle,
    Seek(f64),
    Rate(PlaybackSpeed),
    Quit,
}

fn parse_control(line: &str) -> Result<Control, String> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();

    match (command.as_str(), arg) {
        ("p", None) => Ok(Control::Toggle),
        ("q", None) => Ok(Control::Quit),
        ("s", Some(secs)) => secs
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .map(Control::Seek)
            .ok_or_else(|| format!("Invalid position: {}", secs)),
        ("r", Some(rate)) => rate
            .parse::<PlaybackSpeed>()
            .map(Control::Rate)
            .map_err(|e| e.to_string()),
        _ => Err(CONTROLS_HELP.to_string()),
    }
}

/// A playing sound stopped on its own and rewound
fn just_finished(previous: &PlaybackState, current: &PlaybackState) -> bool {
    previous.is_playing && !current.is_playing && current.position_secs == 0.0
}

/// Play the recording picked by `target` until it ends or the user quits
pub async fn handle_play_command(
    library: &Library,
    target: &str,
    speed: Option<String>,
    presenter: &Presenter,
) -> Result<(), CommandError> {
    let rate = match speed {
        Some(raw) => raw
            .parse::<PlaybackSpeed>()
            .map_err(|e| CommandError::Usage(e.to_string()))?,
        None => library.settings.load().await.playback_speed,
    };
    let recording = library.resolve(target).await?;

    let controller = PlaybackController::new(RodioEngine::new(), HostAudioSession::new(), rate);
    controller.load_audio(&recording.uri).await?;

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    presenter.info(CONTROLS_HELP);
    let bar = presenter.playback_bar(&recording.filename, recording.duration as f64);
    let mut rate_label = rate.to_string();

    let mut state = controller.subscribe();
    let mut previous = *state.borrow_and_update();
    controller.play_pause().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *state.borrow_and_update();
                presenter.update_playback(&bar, &current, &rate_label);
                if just_finished(&previous, &current) {
                    break;
                }
                previous = current;
            }
            line = lines.next_line(), if stdin_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    // Nothing more to read; let the sound run to its end
                    Ok(None) => {
                        stdin_open = false;
                        continue;
                    }
                    Err(e) => {
                        controller.release().await;
                        bar.finish_and_clear();
                        return Err(e.into());
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_control(&line) {
                    Ok(Control::Toggle) => controller.play_pause().await,
                    Ok(Control::Seek(secs)) => controller.seek(secs).await,
                    Ok(Control::Rate(new_rate)) => {
                        controller.set_playback_rate(new_rate).await;
                        rate_label = new_rate.to_string();
                    }
                    Ok(Control::Quit) => break,
                    Err(message) => bar.suspend(|| presenter.warn(&message)),
                }
            }
            _ = shutdown.wait() => break,
        }
    }

    bar.finish_and_clear();
    controller.release().await;
    presenter.success(&format!("Played \"{}\"", recording.filename));
    Ok(())
}

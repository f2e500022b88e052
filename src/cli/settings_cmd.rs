//! Settings command handler

use crate::domain::settings::{PlaybackSpeed, Quality, RecordingSettings, ALL_QUALITIES};

use super::app::{CommandError, Library};
use super::args::{SettingArg, SettingsAction};
use super::presenter::Presenter;

/// Handle settings subcommand
pub async fn handle_settings_command(
    action: SettingsAction,
    library: &Library,
    presenter: &Presenter,
) -> Result<(), CommandError> {
    match action {
        SettingsAction::Show => {
            let settings = library.settings.load().await;
            show(&settings, presenter);
        }
        SettingsAction::Set {
            setting: SettingArg::Quality { value },
        } => {
            let quality = Quality::from(value);
            let settings = library.settings.set_quality(quality).await?;
            presenter.success(&format!("quality = {}", settings.quality));
        }
        SettingsAction::Set {
            setting: SettingArg::Speed { value },
        } => {
            let speed = value
                .parse::<PlaybackSpeed>()
                .map_err(|e| CommandError::Usage(e.to_string()))?;
            let settings = library.settings.set_playback_speed(speed).await?;
            presenter.success(&format!("playback_speed = {}", settings.playback_speed));
        }
    }
    Ok(())
}

fn show(settings: &RecordingSettings, presenter: &Presenter) {
    let preset = settings.quality.preset();
    presenter.key_value(
        "quality",
        &format!(
            "{} ({} Hz, {}-bit mono)",
            settings.quality, preset.sample_rate, preset.bits_per_sample
        ),
    );
    presenter.key_value("playback_speed", &settings.playback_speed.to_string());
    presenter.key_value(
        "available qualities",
        &ALL_QUALITIES
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    );
}

//! Config command handler

use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value);

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value.trim()));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let config = store.load().await?;
    match config_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            &config_value(&config, key).unwrap_or_else(|| "(not set)".to_string()),
        );
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_valid_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "max_duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "data_dir" | "input_device" if value.trim().is_empty() => {
            return Err(ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must not be empty".to_string(),
            });
        }
        _ => {}
    }
    Ok(())
}

/// Store an already validated value
fn apply_value(config: &mut AppConfig, key: &str, value: &str) {
    let value = value.trim();
    match key {
        "data_dir" => config.data_dir = Some(PathBuf::from(value)),
        "input_device" => config.input_device = Some(value.to_string()),
        "max_duration" => config.max_duration = Some(value.to_string()),
        _ => {}
    }
}

fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "data_dir" => config
            .data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        "input_device" => config.input_device.clone(),
        "max_duration" => config.max_duration.clone(),
        _ => None,
    }
}

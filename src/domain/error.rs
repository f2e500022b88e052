//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <seconds>, <number>s, <number>m, <number>m<number>s or m:ss (e.g., 90, 30s, 1m, 2m30s, 1:30)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown quality tier is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid quality: \"{input}\". Valid qualities are: low, medium, high")]
pub struct InvalidQualityError {
    pub input: String,
}

/// Error when a playback speed is not usable
#[derive(Debug, Clone, Error)]
#[error("Invalid playback speed: \"{input}\". {reason}")]
pub struct InvalidPlaybackSpeedError {
    pub input: String,
    pub reason: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

/// Error when a recording is saved without a usable name
#[derive(Debug, Clone, Error)]
#[error("Please enter a filename")]
pub struct EmptyFilenameError;

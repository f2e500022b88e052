//! File logging via tracing
//!
//! Logs go to a daily-rotated file under the XDG state directory so they
//! never mix with the terminal UI. Only the 7 newest files are kept.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "voice-recorder.log";

const MAX_LOG_FILES: usize = 7;

/// Keeps the non-blocking writer alive for the program lifetime
static APPENDER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not determine log directory")]
    NoLogDir,

    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Logging already initialized")]
    AlreadyInitialized,
}

/// Install the global subscriber.
///
/// Level comes from `RUST_LOG`, defaulting to `info`.
pub fn init_logging() -> Result<PathBuf, LoggingError> {
    let log_dir = log_dir()?;

    if let Err(e) = cleanup_old_logs(&log_dir) {
        eprintln!("Warning: Failed to clean up old logs: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    APPENDER_GUARD
        .set(guard)
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::debug!(dir = %log_dir.display(), "logging initialized");
    Ok(log_dir)
}

/// `$XDG_STATE_HOME/voice-recorder`, else `~/.local/state/voice-recorder`
fn log_dir() -> Result<PathBuf, LoggingError> {
    let base = match std::env::var_os("XDG_STATE_HOME") {
        Some(state) if !state.is_empty() => PathBuf::from(state),
        _ => dirs::home_dir()
            .ok_or(LoggingError::NoLogDir)?
            .join(".local/state"),
    };
    let dir = base.join("voice-recorder");

    fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Remove rotated files beyond the newest [`MAX_LOG_FILES`]
fn cleanup_old_logs(log_dir: &Path) -> std::io::Result<()> {
    let mut log_files: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_string_lossy().to_string();
            if !is_rotated_log(&file_name) {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .collect();

    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in log_files.iter().skip(MAX_LOG_FILES) {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Failed to delete old log file {}: {}", path.display(), e);
        }
    }

    Ok(())
}

/// Matches `voice-recorder.log.YYYY-MM-DD`
fn is_rotated_log(file_name: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| date.matches('-').count() == 2)
}

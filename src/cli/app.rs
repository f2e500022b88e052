//! Shared wiring for the subcommands

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use thiserror::Error;

use crate::application::ports::ConfigStore;
use crate::application::{
    CollectionError, Persistence, PersistenceError, PlayerError, RecorderError,
    RecordingsCollection, SettingsStore,
};
use crate::domain::config::AppConfig;
use crate::domain::error::{ConfigError, EmptyFilenameError};
use crate::domain::recording::Recording;
use crate::infrastructure::{FileKeyValueStore, LocalFileStore, XdgConfigStore};

use super::args::Target;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment override for the data directory
pub const DATA_DIR_ENV: &str = "VOICE_RECORDER_DATA_DIR";

/// Errors surfaced by a subcommand
#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad input from the user; exits with [`EXIT_USAGE_ERROR`]
    #[error("{0}")]
    Usage(String),

    #[error("No recording matches \"{0}\"")]
    NotFound(String),

    #[error("{0}")]
    Recorder(#[from] RecorderError),

    #[error("{0}")]
    Player(#[from] PlayerError),

    #[error("{0}")]
    Collection(#[from] CollectionError),

    #[error("Failed to save settings: {0}")]
    Settings(#[from] PersistenceError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Filename(#[from] EmptyFilenameError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CommandError::Usage(_) => ExitCode::from(EXIT_USAGE_ERROR),
            _ => ExitCode::from(EXIT_ERROR),
        }
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Build env config
    let env_config = AppConfig {
        data_dir: env::var_os(DATA_DIR_ENV)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Stores rooted at the data directory
pub struct Library {
    data_dir: PathBuf,
    pub recordings: RecordingsCollection<FileKeyValueStore, LocalFileStore>,
    pub settings: SettingsStore<FileKeyValueStore>,
}

impl Library {
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let persistence = Persistence::new(FileKeyValueStore::new(&data_dir));
        Self {
            recordings: RecordingsCollection::new(persistence.clone(), LocalFileStore::new()),
            settings: SettingsStore::new(persistence),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Where captured audio files are written
    pub fn recordings_dir(&self) -> PathBuf {
        self.data_dir.join("recordings")
    }

    /// Look up a recording by list index or id. Loads the list first.
    pub async fn resolve(&self, raw: &str) -> Result<Recording, CommandError> {
        let list = self.recordings.load_all().await;
        let found = match Target::parse(raw, list.len()) {
            Target::Index(n) => list.into_iter().nth(n - 1),
            Target::Id(id) => list.into_iter().find(|r| r.id == id),
        };
        found.ok_or_else(|| CommandError::NotFound(raw.trim().to_string()))
    }
}

//! Shared helpers for binary tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated config, state and data directories for one test
pub struct Sandbox {
    root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn config_home(&self) -> PathBuf {
        self.root.path().join("config")
    }

    /// The binary with every directory pointed into the sandbox
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("voice-recorder").expect("binary");
        cmd.env("HOME", self.root.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_STATE_HOME", self.root.path().join("state"))
            .env("VOICE_RECORDER_DATA_DIR", self.data_dir())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Write a recordings list and one small audio file per entry.
    /// Entries are `(id, filename)`; ids double as the creation time.
    pub fn seed(&self, entries: &[(&str, &str)]) -> Vec<PathBuf> {
        let audio_dir = self.data_dir().join("recordings");
        fs::create_dir_all(&audio_dir).expect("create data dir");

        let mut files = Vec::new();
        let list: Vec<serde_json::Value> = entries
            .iter()
            .map(|(id, filename)| {
                let path = audio_dir.join(format!("recording-{id}.flac"));
                fs::write(&path, b"fLaC").expect("write audio");
                files.push(path.clone());
                serde_json::json!({
                    "id": id,
                    "uri": path.to_string_lossy(),
                    "filename": filename,
                    "duration": 65,
                    "date": id.parse::<i64>().expect("numeric id"),
                    "size": 2048,
                })
            })
            .collect();

        fs::write(
            self.data_dir().join("recordings.json"),
            serde_json::to_string(&list).expect("json"),
        )
        .expect("write recordings");
        files
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        fs::read_to_string(self.data_dir().join(path)).unwrap_or_default()
    }
}

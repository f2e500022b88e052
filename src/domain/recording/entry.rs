//! Saved recording entity and the descriptor a finished session produces

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::Duration;
use crate::domain::error::EmptyFilenameError;

/// Result of a completed recording session, not yet named or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingDescriptor {
    /// Location of the finalized audio file
    pub uri: String,
    /// Length reported by the capture engine
    pub duration: Duration,
    /// File size in bytes, when it could be read back
    pub size: Option<u64>,
}

/// A saved recording as it is persisted in the recordings list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,
    pub uri: String,
    pub filename: String,
    /// Whole seconds
    pub duration: u64,
    /// Creation time, epoch milliseconds
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Recording {
    /// Build a list entry from a finished session.
    ///
    /// The id is the creation time in epoch milliseconds. The filename is
    /// trimmed and must not be empty.
    pub fn new(
        descriptor: RecordingDescriptor,
        filename: &str,
        created_at: DateTime<Local>,
    ) -> Result<Self, EmptyFilenameError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(EmptyFilenameError);
        }

        let millis = created_at.timestamp_millis();
        Ok(Self {
            id: millis.to_string(),
            uri: descriptor.uri,
            filename: filename.to_string(),
            duration: descriptor.duration.as_secs(),
            date: millis,
            size: descriptor.size,
        })
    }

    /// Creation time in the local timezone
    pub fn created_at(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.date).single()
    }

    /// Locale date string, e.g. `3/5/2024`
    pub fn date_label(&self) -> String {
        self.created_at()
            .map(|dt| dt.format("%-m/%-d/%Y").to_string())
            .unwrap_or_default()
    }

    /// Locale date and time, e.g. `3/5/2024, 2:07:09 PM`
    pub fn date_time_label(&self) -> String {
        self.created_at()
            .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
            .unwrap_or_default()
    }

    /// Duration as `m:ss`
    pub fn duration_label(&self) -> String {
        Duration::from_secs(self.duration).short_clock()
    }

    /// Size as `N/A`, `x.xx KB` or `x.xx MB`
    pub fn size_label(&self) -> String {
        match self.size {
            None | Some(0) => "N/A".to_string(),
            Some(bytes) => {
                let kb = bytes as f64 / 1024.0;
                let mb = kb / 1024.0;
                if mb >= 1.0 {
                    format!("{:.2} MB", mb)
                } else {
                    format!("{:.2} KB", kb)
                }
            }
        }
    }

    /// Case-insensitive match on the filename or the date label.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.filename.to_lowercase().contains(needle) || self.date_label().contains(needle)
    }
}

/// Default name offered when saving, e.g. `Recording_20240305_1407`
pub fn default_filename(now: DateTime<Local>) -> String {
    format!("Recording_{}", now.format("%Y%m%d_%H%M"))
}

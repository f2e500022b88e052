//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the recordings list, settings and audio files live
    pub data_dir: Option<PathBuf>,
    /// Input device name; the host default is used when unset
    pub input_device: Option<String>,
    /// Safety limit for `record`, e.g. "30m"
    pub max_duration: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            data_dir: default_data_dir(),
            input_device: None,
            max_duration: Some("60m".to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            data_dir: other.data_dir.or(self.data_dir),
            input_device: other.input_device.or(self.input_device),
            max_duration: other.max_duration.or(self.max_duration),
        }
    }

    /// Get the data directory, falling back to the platform default
    /// and finally to the working directory
    pub fn data_dir_or_default(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from(".voice-recorder"))
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("voice-recorder"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.input_device.is_none());
        assert_eq!(config.max_duration, Some("60m".to_string()));
        assert_eq!(config.max_duration_or_default().as_secs(), 3600);
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.data_dir.is_none());
        assert!(config.input_device.is_none());
        assert!(config.max_duration.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            data_dir: Some(PathBuf::from("/base")),
            input_device: Some("USB Mic".to_string()),
            max_duration: Some("10m".to_string()),
        };

        let other = AppConfig {
            data_dir: Some(PathBuf::from("/other")),
            input_device: None,
            max_duration: Some("5m".to_string()),
        };

        let merged = base.merge(other);

        assert_eq!(merged.data_dir, Some(PathBuf::from("/other")));
        assert_eq!(merged.input_device, Some("USB Mic".to_string()));
        assert_eq!(merged.max_duration, Some("5m".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            input_device: Some("USB Mic".to_string()),
            ..Default::default()
        };
        let merged = base.merge(AppConfig::empty());
        assert_eq!(merged.input_device, Some("USB Mic".to_string()));
    }

    #[test]
    fn data_dir_or_default_prefers_configured() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/tmp/notes")),
            ..Default::default()
        };
        assert_eq!(config.data_dir_or_default(), PathBuf::from("/tmp/notes"));
    }

    #[test]
    fn max_duration_or_default_parses() {
        let config = AppConfig {
            max_duration: Some("2m30s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 150);
    }

    #[test]
    fn max_duration_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            max_duration: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 3600);
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/srv/voice")),
            input_device: None,
            max_duration: Some("15m".to_string()),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}

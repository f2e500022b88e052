//! Recording settings value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{InvalidPlaybackSpeedError, InvalidQualityError};

/// All quality tiers, lowest first
pub const ALL_QUALITIES: &[Quality] = &[Quality::Low, Quality::Medium, Quality::High];

/// Recording quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    #[default]
    High,
}

impl Quality {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Encoding parameters used when capturing at this tier
    pub const fn preset(&self) -> EncodingPreset {
        let sample_rate = match self {
            Self::Low => 16_000,
            Self::Medium => 22_050,
            Self::High => 44_100,
        };
        EncodingPreset {
            sample_rate,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

impl FromStr for Quality {
    type Err = InvalidQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(InvalidQualityError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capture encoding parameters. Output is always FLAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingPreset {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

/// Playback rate multiplier.
///
/// Any positive finite value is accepted when loaded from storage; parsing
/// user input is limited to [`PlaybackSpeed::SUPPORTED`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct PlaybackSpeed(f32);

impl PlaybackSpeed {
    pub const SUPPORTED: &'static [f32] = &[0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

    pub const NORMAL: Self = Self(1.0);

    pub const fn value(&self) -> f32 {
        self.0
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<f32> for PlaybackSpeed {
    type Error = InvalidPlaybackSpeedError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(InvalidPlaybackSpeedError {
                input: value.to_string(),
                reason: "Speed must be a positive number".to_string(),
            })
        }
    }
}

impl From<PlaybackSpeed> for f32 {
    fn from(speed: PlaybackSpeed) -> Self {
        speed.0
    }
}

impl FromStr for PlaybackSpeed {
    type Err = InvalidPlaybackSpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('x');
        let value: f32 = trimmed.parse().map_err(|_| InvalidPlaybackSpeedError {
            input: s.to_string(),
            reason: "Expected a number".to_string(),
        })?;

        if !Self::SUPPORTED.iter().any(|v| (v - value).abs() < f32::EPSILON) {
            return Err(InvalidPlaybackSpeedError {
                input: s.to_string(),
                reason: "Supported speeds are 0.5, 0.75, 1.0, 1.25, 1.5, 2.0".to_string(),
            });
        }

        Self::try_from(value)
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Persisted user settings. Missing fields fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordingSettings {
    pub quality: Quality,
    pub playback_speed: PlaybackSpeed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_qualities() {
        assert_eq!("low".parse::<Quality>().unwrap(), Quality::Low);
        assert_eq!(" Medium ".parse::<Quality>().unwrap(), Quality::Medium);
        assert_eq!("HIGH".parse::<Quality>().unwrap(), Quality::High);
        assert!("ultra".parse::<Quality>().is_err());
    }

    #[test]
    fn presets_are_distinct_per_tier() {
        let rates: Vec<u32> = ALL_QUALITIES.iter().map(|q| q.preset().sample_rate).collect();
        assert_eq!(rates, vec![16_000, 22_050, 44_100]);
        for q in ALL_QUALITIES {
            assert_eq!(q.preset().channels, 1);
            assert_eq!(q.preset().bits_per_sample, 16);
        }
    }

    #[test]
    fn speed_parse_accepts_supported_values() {
        assert_eq!("1.5".parse::<PlaybackSpeed>().unwrap().value(), 1.5);
        assert_eq!("0.75x".parse::<PlaybackSpeed>().unwrap().value(), 0.75);
        assert!("3".parse::<PlaybackSpeed>().is_err());
        assert!("fast".parse::<PlaybackSpeed>().is_err());
    }

    #[test]
    fn speed_try_from_requires_positive_finite() {
        assert!(PlaybackSpeed::try_from(1.1).is_ok());
        assert!(PlaybackSpeed::try_from(0.0).is_err());
        assert!(PlaybackSpeed::try_from(-1.0).is_err());
        assert!(PlaybackSpeed::try_from(f32::NAN).is_err());
        assert!(PlaybackSpeed::try_from(f32::INFINITY).is_err());
    }

    #[test]
    fn settings_default() {
        let settings = RecordingSettings::default();
        assert_eq!(settings.quality, Quality::High);
        assert_eq!(settings.playback_speed.value(), 1.0);
    }

    #[test]
    fn settings_json_field_names() {
        let settings = RecordingSettings {
            quality: Quality::Medium,
            playback_speed: PlaybackSpeed::try_from(1.5).unwrap(),
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"quality":"medium","playbackSpeed":1.5}"#);

        let back: RecordingSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn settings_json_fills_missing_fields() {
        let settings: RecordingSettings = serde_json::from_str(r#"{"quality":"low"}"#).unwrap();
        assert_eq!(settings.quality, Quality::Low);
        assert_eq!(settings.playback_speed, PlaybackSpeed::NORMAL);
    }

    #[test]
    fn settings_json_rejects_non_positive_speed() {
        let result = serde_json::from_str::<RecordingSettings>(
            r#"{"quality":"low","playbackSpeed":0}"#,
        );
        assert!(result.is_err());
    }
}

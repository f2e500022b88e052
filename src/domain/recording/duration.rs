//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default safety limit for a single recording (one hour)
pub const DEFAULT_MAX_DURATION_SECS: u64 = 60 * 60;

/// Value object representing a recording length in whole seconds.
///
/// Sub-second precision is dropped on purpose: recordings store their
/// duration as an integer number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    seconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds, flooring to whole seconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { seconds: ms / 1000 }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self { seconds: secs }
    }

    /// Default safety limit for `record`
    pub const fn default_max_duration() -> Self {
        Self::from_secs(DEFAULT_MAX_DURATION_SECS)
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.seconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.seconds)
    }

    /// Short clock form used in lists, e.g. `1:05`
    pub fn short_clock(&self) -> String {
        format!("{}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

impl From<StdDuration> for Duration {
    fn from(value: StdDuration) -> Self {
        Self::from_secs(value.as_secs())
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string.
    /// Supported formats: "90", "30s", "1m", "2m30s", "1:30"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let invalid = || DurationParseError {
            input: s.to_string(),
        };

        if input.is_empty() {
            return Err(invalid());
        }

        // Clock form: m:ss
        if let Some((mins, secs)) = input.split_once(':') {
            let minutes: u64 = mins.parse().map_err(|_| invalid())?;
            let seconds: u64 = secs.parse().map_err(|_| invalid())?;
            if secs.len() != 2 || seconds >= 60 {
                return Err(invalid());
            }
            let total = minutes * 60 + seconds;
            return if total == 0 {
                Err(invalid())
            } else {
                Ok(Self::from_secs(total))
            };
        }

        // Bare seconds
        if input.chars().all(|c| c.is_ascii_digit()) {
            let total: u64 = input.parse().map_err(|_| invalid())?;
            return if total == 0 {
                Err(invalid())
            } else {
                Ok(Self::from_secs(total))
            };
        }

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num.parse().map_err(|_| invalid())?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num.parse().map_err(|_| invalid())?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(invalid());
            }
        }

        if !current_num.is_empty() || !found_any {
            return Err(invalid());
        }

        let total = minutes * 60 + seconds;
        if total == 0 {
            return Err(invalid());
        }

        Ok(Self::from_secs(total))
    }
}

impl fmt::Display for Duration {
    /// Recording timer form, e.g. `02:05`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

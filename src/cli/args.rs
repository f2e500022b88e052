//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::settings::Quality;

/// Voice Recorder - record, search and play back voice notes
#[derive(Parser, Debug)]
#[command(name = "voice-recorder")]
#[command(version)]
#[command(about = "Record, search and play back voice notes from the terminal")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory holding the recordings list, settings and audio files
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new voice note (Enter saves, c + Enter cancels)
    Record {
        /// Name to save the recording under
        #[arg(short, long)]
        name: Option<String>,

        /// Stop automatically after this long (e.g., 30s, 5m, 1m30s)
        #[arg(short = 'm', long, value_name = "TIME")]
        max_duration: Option<String>,
    },
    /// List saved recordings, newest first
    List {
        /// Only show recordings whose name or date contains QUERY
        #[arg(short, long, value_name = "QUERY")]
        search: Option<String>,
    },
    /// Play a recording
    Play {
        /// List index (1-based) or recording id
        target: String,

        /// Playback speed (e.g., 1.5 or 1.5x)
        #[arg(short, long, value_name = "X")]
        speed: Option<String>,
    },
    /// Delete a recording and its audio file
    Delete {
        /// List index (1-based) or recording id
        target: String,
    },
    /// Show or change recording settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Settings action subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show current settings
    Show,
    /// Change a setting
    Set {
        #[command(subcommand)]
        setting: SettingArg,
    },
}

/// Settings that can be changed
#[derive(Subcommand, Debug)]
pub enum SettingArg {
    /// Recording quality
    Quality {
        #[arg(value_enum)]
        value: QualityArg,
    },
    /// Default playback speed (0.5, 0.75, 1, 1.25, 1.5, 2)
    Speed { value: String },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Quality argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    Low,
    Medium,
    High,
}

impl From<QualityArg> for Quality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => Quality::Low,
            QualityArg::Medium => Quality::Medium,
            QualityArg::High => Quality::High,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["data_dir", "input_device", "max_duration"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

/// A recording picked on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 1-based position in the newest-first list
    Index(usize),
    Id(String),
}

impl Target {
    /// Small positive numbers are list positions, anything else is an id.
    /// Ids are epoch milliseconds, so they never collide with an index.
    pub fn parse(raw: &str, list_len: usize) -> Self {
        match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= list_len => Target::Index(n),
            _ => Target::Id(raw.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_record_defaults() {
        let cli = Cli::parse_from(["voice-recorder", "record"]);
        if let Commands::Record { name, max_duration } = cli.command {
            assert!(name.is_none());
            assert!(max_duration.is_none());
        } else {
            panic!("Expected Record command");
        }
    }

    #[test]
    fn cli_parses_record_options() {
        let cli = Cli::parse_from(["voice-recorder", "record", "-n", "Standup", "-m", "5m"]);
        if let Commands::Record { name, max_duration } = cli.command {
            assert_eq!(name, Some("Standup".to_string()));
            assert_eq!(max_duration, Some("5m".to_string()));
        } else {
            panic!("Expected Record command");
        }
    }

    #[test]
    fn cli_parses_list_search() {
        let cli = Cli::parse_from(["voice-recorder", "list", "--search", "memo"]);
        assert!(matches!(
            cli.command,
            Commands::List { search: Some(ref q) } if q == "memo"
        ));
    }

    #[test]
    fn cli_parses_play_with_speed() {
        let cli = Cli::parse_from(["voice-recorder", "play", "2", "--speed", "1.5x"]);
        if let Commands::Play { target, speed } = cli.command {
            assert_eq!(target, "2");
            assert_eq!(speed, Some("1.5x".to_string()));
        } else {
            panic!("Expected Play command");
        }
    }

    #[test]
    fn cli_parses_global_data_dir() {
        let cli = Cli::parse_from(["voice-recorder", "list", "--data-dir", "/tmp/notes"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/notes")));
    }

    #[test]
    fn cli_parses_settings_set_quality() {
        let cli = Cli::parse_from(["voice-recorder", "settings", "set", "quality", "low"]);
        assert!(matches!(
            cli.command,
            Commands::Settings {
                action: SettingsAction::Set {
                    setting: SettingArg::Quality {
                        value: QualityArg::Low
                    }
                }
            }
        ));
    }

    #[test]
    fn cli_rejects_unknown_quality() {
        let result = Cli::try_parse_from(["voice-recorder", "settings", "set", "quality", "ultra"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["voice-recorder", "config", "set", "max_duration", "10m"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "max_duration");
            assert_eq!(value, "10m");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["voice-recorder"]).is_err());
    }

    #[test]
    fn quality_arg_converts() {
        assert_eq!(Quality::from(QualityArg::Low), Quality::Low);
        assert_eq!(Quality::from(QualityArg::High), Quality::High);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("data_dir"));
        assert!(is_valid_config_key("max_duration"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn target_index_or_id() {
        assert_eq!(Target::parse("1", 3), Target::Index(1));
        assert_eq!(Target::parse(" 3 ", 3), Target::Index(3));
        assert_eq!(Target::parse("4", 3), Target::Id("4".to_string()));
        assert_eq!(Target::parse("0", 3), Target::Id("0".to_string()));
        assert_eq!(
            Target::parse("1709650029000", 3),
            Target::Id("1709650029000".to_string())
        );
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}

//! CLI presenter for output formatting

use std::time::Duration as StdDuration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::playback::PlaybackState;
use crate::domain::recording::{Duration, Recording};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.red} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(StdDuration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Live recording line, e.g. `● REC 01:05 / 60:00`
    pub fn format_recording(&self, elapsed: Duration, limit: Duration) -> String {
        format!("{} {} / {}", "● REC".red().bold(), elapsed, limit)
    }

    /// Show the live recording timer
    pub fn show_recording(&mut self, limit: Duration) {
        let line = self.format_recording(Duration::default(), limit);
        self.start_spinner(&line);
        self.info("Press Enter to save, c + Enter (or Ctrl+C) to cancel");
    }

    pub fn update_recording(&self, elapsed: Duration, limit: Duration) {
        self.update_spinner(&self.format_recording(elapsed, limit));
    }

    /// One row of the recordings table
    pub fn format_recording_row(&self, index: usize, recording: &Recording) -> String {
        format!(
            "{}  {}  {}  {:>6}  {:>10}  {}",
            format!("{:>3}", index).bold(),
            recording.filename,
            recording.date_time_label().dimmed(),
            recording.duration_label(),
            recording.size_label(),
            format!("#{}", recording.id).dimmed(),
        )
    }

    /// Print one row of the recordings table
    pub fn recording_row(&self, index: usize, recording: &Recording) {
        self.output(&self.format_recording_row(index, recording));
    }

    /// Progress bar over the length of a sound, in milliseconds
    pub fn playback_bar(&self, title: &str, duration_secs: f64) -> ProgressBar {
        let bar = ProgressBar::new(secs_to_millis(duration_secs));
        if let Ok(style) =
            ProgressStyle::with_template("{prefix:.bold} [{bar:30.cyan/blue}] {msg}")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar.set_prefix(title.to_string());
        bar
    }

    /// Mirror `state` onto a bar from [`playback_bar`](Self::playback_bar)
    pub fn update_playback(&self, bar: &ProgressBar, state: &PlaybackState, rate: &str) {
        if state.duration_secs > 0.0 {
            bar.set_length(secs_to_millis(state.duration_secs));
        }
        bar.set_position(secs_to_millis(state.position_secs));
        bar.set_message(self.format_playback(state, rate));
    }

    /// e.g. `▶ 0:03 / 0:10 1x`
    pub fn format_playback(&self, state: &PlaybackState, rate: &str) -> String {
        let icon = if state.is_playing { "▶".green() } else { "⏸".yellow() };
        format!(
            "{} {} / {} {}",
            icon,
            Duration::from_secs(state.position_secs as u64).short_clock(),
            Duration::from_secs(state.duration_secs as u64).short_clock(),
            rate
        )
    }

    /// Print a key-value pair (for config and settings listings)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

fn secs_to_millis(secs: f64) -> u64 {
    (secs.max(0.0) * 1000.0) as u64
}

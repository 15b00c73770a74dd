/*!
 * Application configuration module.
 *
 * This module handles the engine configuration including loading,
 * validating and saving configuration settings.
 */

use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::export::ExportFormat;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the generated text (ISO code)
    #[serde(default = "default_language")]
    pub language: String,

    /// Line layout limits
    #[serde(default)]
    pub formatting: FormattingConfig,

    /// Timing model
    #[serde(default)]
    pub timing: TimingConfig,

    /// Edit session behaviour
    #[serde(default)]
    pub editor: EditorConfig,

    /// Export defaults
    #[serde(default)]
    pub export: ExportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Line layout limits
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FormattingConfig {
    /// Maximum characters per display line
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    /// Maximum lines per subtitle
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: default_max_chars_per_line(),
            max_lines: default_max_lines(),
        }
    }
}

/// Reading-speed model used to derive subtitle durations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    /// Characters a viewer reads per minute
    #[serde(default = "default_reading_speed_cpm")]
    pub reading_speed_cpm: f64,

    /// Shortest display duration in ms
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    /// Longest display duration in ms
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,

    /// Blank gap between consecutive subtitles in ms
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reading_speed_cpm: default_reading_speed_cpm(),
            min_duration_ms: default_min_duration_ms(),
            max_duration_ms: default_max_duration_ms(),
            gap_ms: default_gap_ms(),
        }
    }
}

impl TimingConfig {
    /// Maximum comfortable characters per second
    pub fn max_chars_per_second(&self) -> f64 {
        self.reading_speed_cpm / 60.0
    }
}

/// Whether the timeline resolves overlaps on write
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    #[default]
    Resolve,
    Allow,
}

/// Edit session behaviour
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EditorConfig {
    /// Gap inserted after a moved entry when pushing conflicts forward
    #[serde(default = "default_gap_ms")]
    pub conflict_gap_ms: u64,

    /// Maximum undo depth
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Run particle correction on Korean text edits
    #[serde(default = "default_true")]
    pub auto_correct_particles: bool,

    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            conflict_gap_ms: default_gap_ms(),
            history_limit: default_history_limit(),
            auto_correct_particles: true,
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

/// Export defaults
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// Format used when none is given on the command line
    #[serde(default = "default_export_format")]
    pub default_format: String,

    /// Generator name written into JSON exports
    #[serde(default = "default_generator_name")]
    pub generator_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: default_export_format(),
            generator_name: default_generator_name(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "ko".to_string()
}

fn default_max_chars_per_line() -> usize {
    18
}

fn default_max_lines() -> usize {
    2
}

fn default_reading_speed_cpm() -> f64 {
    300.0 // 5 characters per second
}

fn default_min_duration_ms() -> u64 {
    1000
}

fn default_max_duration_ms() -> u64 {
    7000
}

fn default_gap_ms() -> u64 {
    100
}

fn default_history_limit() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_export_format() -> String {
    "srt".to_string()
}

fn default_generator_name() -> String {
    "hansub".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::get_language_name(&self.language)?;

        if self.formatting.max_chars_per_line == 0 {
            return Err(anyhow!("max_chars_per_line must be greater than 0"));
        }
        if self.formatting.max_lines == 0 {
            return Err(anyhow!("max_lines must be greater than 0"));
        }

        let timing = &self.timing;
        if !(timing.reading_speed_cpm.is_finite() && timing.reading_speed_cpm > 0.0) {
            return Err(anyhow!("reading_speed_cpm must be a positive number"));
        }
        if timing.min_duration_ms == 0 || timing.min_duration_ms > timing.max_duration_ms {
            return Err(anyhow!(
                "Invalid duration bounds: min {}ms, max {}ms",
                timing.min_duration_ms, timing.max_duration_ms
            ));
        }
        if timing.gap_ms >= timing.min_duration_ms {
            return Err(anyhow!(
                "gap_ms ({}) must be smaller than min_duration_ms ({})",
                timing.gap_ms, timing.min_duration_ms
            ));
        }

        if self.editor.history_limit == 0 {
            return Err(anyhow!("history_limit must be greater than 0"));
        }

        self.export
            .default_format
            .parse::<ExportFormat>()
            .map_err(|e| anyhow!("{}", e))?;

        Ok(())
    }

    /// Load configuration from a JSON file, writing the defaults if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            formatting: FormattingConfig::default(),
            timing: TimingConfig::default(),
            editor: EditorConfig::default(),
            export: ExportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

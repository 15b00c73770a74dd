/*!
 * Subtitle export and import.
 *
 * Every exporter sorts entries by start time first and produces byte-exact
 * output for identical input:
 * - `srt`: numbered blocks with `HH:MM:SS,mmm` timestamps
 * - `vtt`: `WEBVTT` header, then SRT-shaped cues with `HH:MM:SS.mmm`
 * - `ass`: fixed script/style preamble and one `Dialogue:` line per entry
 * - `json`: versioned document with raw and formatted times
 */

use std::fmt;
use std::str::FromStr;
use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::errors::EditError;
use crate::subtitle::SubtitleEntry;

pub mod ass;
pub mod json;
pub mod srt;
pub mod vtt;

pub use json::parse_json;
pub use srt::parse_srt;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Srt,
    Vtt,
    Ass,
    Json,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = EditError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "ass" | "ssa" => Ok(Self::Ass),
            "json" => Ok(Self::Json),
            _ => Err(EditError::UnsupportedExportFormat(s.to_string())),
        }
    }
}

/// Serializes subtitle entries to text formats
#[derive(Debug, Clone)]
pub struct Exporter {
    generator_name: String,
}

impl Exporter {
    pub fn new(generator_name: impl Into<String>) -> Self {
        Self {
            generator_name: generator_name.into(),
        }
    }

    pub fn generator_name(&self) -> &str {
        &self.generator_name
    }

    /// Export entries in the given format, stamping JSON output with the current time
    pub fn export(&self, entries: &[SubtitleEntry], format: ExportFormat) -> Result<String> {
        self.export_at(entries, format, Utc::now())
    }

    /// Export with an explicit generation timestamp, for reproducible JSON
    pub fn export_at(&self, entries: &[SubtitleEntry], format: ExportFormat, generated: DateTime<Utc>) -> Result<String> {
        let sorted = sorted_by_start(entries);
        match format {
            ExportFormat::Srt => Ok(srt::to_srt(&sorted)),
            ExportFormat::Vtt => Ok(vtt::to_vtt(&sorted)),
            ExportFormat::Ass => Ok(ass::to_ass(&sorted, &self.generator_name)),
            ExportFormat::Json => json::to_json(&sorted, &self.generator_name, generated),
        }
    }

    /// Export using a format name such as `"srt"` or `"webvtt"`
    pub fn export_named(&self, entries: &[SubtitleEntry], format: &str) -> Result<String> {
        let format: ExportFormat = format.parse()?;
        self.export(entries, format)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new("hansub")
    }
}

fn sorted_by_start(entries: &[SubtitleEntry]) -> Vec<&SubtitleEntry> {
    let mut sorted: Vec<&SubtitleEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.start_time_ms);
    sorted
}

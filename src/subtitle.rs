/*!
 * Subtitle entry model.
 *
 * A `SubtitleEntry` is one timed caption: an id unique within its timeline,
 * a `[start, end)` interval in milliseconds, the caption text, and optional
 * style and position hints used by the exporters.
 */

use std::fmt;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::{EditError, EditResult};

// @enum: Text animation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    #[default]
    None,
    Fade,
    Slide,
    Typewriter,
}

// @enum: Vertical placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Visual style hints carried with an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleStyle {
    /// Font size in points
    pub font_size: u32,

    /// Foreground colour as `#RRGGBB`
    pub color: String,

    /// Background colour as `#RRGGBB`, transparent when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    /// CSS-like weight (400 normal, 700 bold)
    pub font_weight: u16,

    #[serde(default)]
    pub animation: Animation,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_size: 48,
            color: "#FFFFFF".to_string(),
            background_color: None,
            font_weight: 400,
            animation: Animation::None,
        }
    }
}

impl SubtitleStyle {
    pub fn is_bold(&self) -> bool {
        self.font_weight >= 600
    }
}

/// A `[start, end)` interval in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl TimeRange {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleEntry {
    // @field: Identifier, unique within a timeline
    pub id: String,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,

    // @field: Optional style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<SubtitleStyle>,

    // @field: Optional placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry without validation
    pub fn new(id: impl Into<String>, start_time_ms: u64, end_time_ms: u64, text: impl Into<String>) -> Self {
        SubtitleEntry {
            id: id.into(),
            start_time_ms,
            end_time_ms,
            text: text.into(),
            style: None,
            position: None,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(id: impl Into<String>, start_time_ms: u64, end_time_ms: u64, text: &str) -> EditResult<Self> {
        let id = id.into();
        if end_time_ms <= start_time_ms {
            return Err(EditError::InvalidTimeRange {
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(EditError::EmptyText(id));
        }

        Ok(SubtitleEntry::new(id, start_time_ms, end_time_ms, trimmed_text))
    }

    pub fn with_style(mut self, style: SubtitleStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// The entry's interval
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time_ms, self.end_time_ms)
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_time_ms.saturating_sub(self.start_time_ms)
    }

    /// Number of characters in the text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether this entry's `[start, end)` interval intersects another's
    pub fn overlaps(&self, other: &SubtitleEntry) -> bool {
        self.start_time_ms < other.end_time_ms && other.start_time_ms < self.end_time_ms
    }

    /// Parse an SRT or VTT timestamp (`HH:MM:SS,mmm` or `HH:MM:SS.mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] {} --> {} {}",
            self.id,
            Self::format_timestamp(self.start_time_ms),
            Self::format_timestamp(self.end_time_ms),
            self.text
        )
    }
}

/// Convert fractional seconds to whole milliseconds
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}

/// Convert milliseconds to fractional seconds
pub fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ImportError;
use crate::subtitle::{ms_to_seconds, seconds_to_ms, Position, SubtitleEntry, SubtitleStyle};

const JSON_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
struct JsonDocument {
    version: String,
    generated: String,
    generator: String,
    subtitles: Vec<JsonSubtitle>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonSubtitle {
    id: String,
    /// Seconds
    start_time: f64,
    /// Seconds
    end_time: f64,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<SubtitleStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(default)]
    start_time_formatted: String,
    #[serde(default)]
    end_time_formatted: String,
}

/// Format milliseconds as `M:SS.s` (minutes unpadded, tenths truncated)
pub fn format_json_time(ms: u64) -> String {
    let minutes = ms / 60_000;
    let tenths = (ms % 60_000) / 100;
    format!("{}:{:02}.{}", minutes, tenths / 10, tenths % 10)
}

/// Render the JSON export document
pub fn to_json(entries: &[&SubtitleEntry], generator: &str, generated: DateTime<Utc>) -> Result<String> {
    let document = JsonDocument {
        version: JSON_FORMAT_VERSION.to_string(),
        generated: generated.to_rfc3339_opts(SecondsFormat::Millis, true),
        generator: generator.to_string(),
        subtitles: entries
            .iter()
            .map(|entry| JsonSubtitle {
                id: entry.id.clone(),
                start_time: ms_to_seconds(entry.start_time_ms),
                end_time: ms_to_seconds(entry.end_time_ms),
                text: entry.text.clone(),
                style: entry.style.clone(),
                position: entry.position,
                start_time_formatted: format_json_time(entry.start_time_ms),
                end_time_formatted: format_json_time(entry.end_time_ms),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&document).context("Failed to serialize subtitles to JSON")
}

/// Parse a JSON export back into entries; formatted times are ignored
pub fn parse_json(content: &str) -> Result<Vec<SubtitleEntry>, ImportError> {
    let document: JsonDocument = serde_json::from_str(content)?;

    document
        .subtitles
        .into_iter()
        .map(|subtitle| -> Result<SubtitleEntry, ImportError> {
            let mut entry = SubtitleEntry::new_validated(
                subtitle.id,
                seconds_to_ms(subtitle.start_time),
                seconds_to_ms(subtitle.end_time),
                &subtitle.text,
            )?;
            entry.style = subtitle.style;
            entry.position = subtitle.position;
            Ok(entry)
        })
        .collect()
}

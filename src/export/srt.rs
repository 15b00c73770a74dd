use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ImportError;
use crate::subtitle::SubtitleEntry;

// @const: SRT/VTT cue timing line; VTT's period separator is accepted too
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d+):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

/// Format milliseconds as `HH:MM:SS,mmm`
pub fn format_srt_time(ms: u64) -> String {
    SubtitleEntry::format_timestamp(ms)
}

/// Render numbered SRT blocks separated by blank lines
pub fn to_srt(entries: &[&SubtitleEntry]) -> String {
    cue_blocks(entries, format_srt_time)
}

/// Shared SRT/VTT cue layout: `index\nstart --> end\ntext\n`, blocks joined by `\n`
pub(crate) fn cue_blocks(entries: &[&SubtitleEntry], format_time: fn(u64) -> String) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                format_time(entry.start_time_ms),
                format_time(entry.end_time_ms),
                entry.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse SRT content into entries with ids `sub_1`, `sub_2`, ... in start order.
///
/// Blocks with empty text or an inverted time range are skipped with a
/// warning; a timing line that cannot be parsed is an error.
pub fn parse_srt(content: &str) -> Result<Vec<SubtitleEntry>, ImportError> {
    let content = content.trim_start_matches('\u{feff}');
    let mut entries = Vec::new();
    let mut block = 0usize;
    let mut current: Option<(u64, u64)> = None;
    let mut text = String::new();

    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if let Some(range) = current.take() {
                push_entry(&mut entries, block, range, &text);
                text.clear();
            }
            continue;
        }

        if current.is_none() {
            if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                block += 1;
                let invalid = || ImportError::InvalidTimestamp {
                    block,
                    line: trimmed.to_string(),
                };
                let start = timestamp_ms(&caps, 1).ok_or_else(invalid)?;
                let end = timestamp_ms(&caps, 5).ok_or_else(invalid)?;
                current = Some((start, end));
                continue;
            }

            if trimmed.contains("-->") {
                return Err(ImportError::InvalidTimestamp {
                    block: block + 1,
                    line: trimmed.to_string(),
                });
            }

            // Sequence numbers carry no information; ids are assigned after sorting
            if trimmed.parse::<usize>().is_err() {
                warn!("Unexpected text at line {} before a timestamp: {}", line_no + 1, trimmed);
            }
            continue;
        }

        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(trimmed);
    }

    if let Some(range) = current {
        push_entry(&mut entries, block, range, &text);
    }

    entries.sort_by_key(|entry| entry.start_time_ms);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.id = format!("sub_{}", i + 1);
    }

    Ok(entries)
}

fn push_entry(entries: &mut Vec<SubtitleEntry>, block: usize, (start, end): (u64, u64), text: &str) {
    match SubtitleEntry::new_validated(format!("block_{}", block), start, end, text) {
        Ok(entry) => entries.push(entry),
        Err(e) => warn!("Skipping invalid subtitle block {}: {}", block, e),
    }
}

fn timestamp_ms(caps: &regex::Captures, start_idx: usize) -> Option<u64> {
    let part = |offset: usize| -> Option<u64> { caps.get(start_idx + offset)?.as_str().parse().ok() };
    let (hours, minutes, seconds, millis) = (part(0)?, part(1)?, part(2)?, part(3)?);

    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    Some((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
}

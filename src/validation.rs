/*!
 * Advisory validation of subtitle entries.
 *
 * Nothing here rejects or fixes input. Each check produces a readable warning:
 * - start >= end
 * - overlap with the previous entry in start order
 * - empty text
 * - reading speed above the configured characters per second
 */

use std::fmt;
use log::debug;

use crate::app_config::TimingConfig;
use crate::subtitle::SubtitleEntry;

/// A problem found on one entry
#[derive(Debug, Clone, PartialEq)]
pub enum SubtitleIssue {
    InvalidTimeRange { start_ms: u64, end_ms: u64 },
    OverlapsPrevious { previous_id: String, overlap_ms: u64 },
    EmptyText,
    ReadingSpeedTooHigh { cps: f64, max_cps: f64 },
}

impl fmt::Display for SubtitleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtitleIssue::InvalidTimeRange { start_ms, end_ms } => {
                write!(f, "start time {}ms is not before end time {}ms", start_ms, end_ms)
            }
            SubtitleIssue::OverlapsPrevious { previous_id, overlap_ms } => {
                write!(f, "overlaps {} by {}ms", previous_id, overlap_ms)
            }
            SubtitleIssue::EmptyText => write!(f, "text is empty"),
            SubtitleIssue::ReadingSpeedTooHigh { cps, max_cps } => {
                write!(f, "reading speed too high: {:.1} CPS (max: {:.1})", cps, max_cps)
            }
        }
    }
}

/// Check every entry, returning `(entry id, issue)` pairs in start order
pub fn find_issues(entries: &[SubtitleEntry], timing: &TimingConfig) -> Vec<(String, SubtitleIssue)> {
    let mut sorted: Vec<&SubtitleEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.start_time_ms);

    let max_cps = timing.max_chars_per_second();
    let mut issues = Vec::new();
    let mut previous: Option<&SubtitleEntry> = None;

    for entry in sorted {
        let mut push = |issue| issues.push((entry.id.clone(), issue));

        if entry.start_time_ms >= entry.end_time_ms {
            push(SubtitleIssue::InvalidTimeRange {
                start_ms: entry.start_time_ms,
                end_ms: entry.end_time_ms,
            });
        }

        if let Some(prev) = previous {
            if entry.start_time_ms < prev.end_time_ms {
                push(SubtitleIssue::OverlapsPrevious {
                    previous_id: prev.id.clone(),
                    overlap_ms: prev.end_time_ms.min(entry.end_time_ms).saturating_sub(entry.start_time_ms),
                });
            }
        }

        let chars = entry.text.chars().filter(|c| !c.is_whitespace()).count();
        if chars == 0 {
            push(SubtitleIssue::EmptyText);
        } else if entry.duration_ms() > 0 {
            let cps = chars as f64 / (entry.duration_ms() as f64 / 1000.0);
            if cps > max_cps {
                push(SubtitleIssue::ReadingSpeedTooHigh { cps, max_cps });
            }
        }

        if previous.is_none_or(|prev| entry.end_time_ms > prev.end_time_ms) {
            previous = Some(entry);
        }
    }

    debug!("Validation found {} issues in {} entries", issues.len(), entries.len());
    issues
}

/// Human-readable warnings for `entries`. Empty when everything looks fine.
pub fn validate_subtitles(entries: &[SubtitleEntry], timing: &TimingConfig) -> Vec<String> {
    find_issues(entries, timing)
        .into_iter()
        .map(|(id, issue)| format!("Entry {}: {}", id, issue))
        .collect()
}

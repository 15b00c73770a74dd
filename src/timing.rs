/*!
 * Subtitle timing allocation.
 *
 * Timing is computed in two passes. First each chunk gets a duration from the
 * reading-speed model, clamped to the configured bounds, and chunks are laid
 * out back to back with a gap. Then the whole layout is uniformly rescaled so
 * the final entry ends exactly at the caller's target duration.
 */

use log::{debug, warn};

use crate::app_config::TimingConfig;
use crate::subtitle::{SubtitleEntry, seconds_to_ms};

/// Assigns start/end times to text chunks
pub struct TimingAllocator {
    config: TimingConfig,
}

impl TimingAllocator {
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Reading-time estimate for one chunk, clamped to `[min, max]`, in ms
    pub fn estimate_duration_ms(&self, chunk: &str) -> u64 {
        let chars = chunk.chars().filter(|c| *c != '\n').count() as f64;
        let seconds = chars / self.config.reading_speed_cpm * 60.0;
        seconds_to_ms(seconds).clamp(self.config.min_duration_ms, self.config.max_duration_ms)
    }

    /// Time the chunks so they span exactly `total_duration_seconds`.
    ///
    /// Entries get ids `sub_1`, `sub_2`, ... and start relative to 0. A
    /// non-positive or non-finite total keeps the reading-speed estimate.
    /// A target shorter than one millisecond per chunk cannot be met; the
    /// entries then keep 1ms each and the last one ends past the target.
    pub fn allocate(&self, chunks: &[String], total_duration_seconds: f64) -> Vec<SubtitleEntry> {
        if chunks.is_empty() {
            return Vec::new();
        }

        let gap = self.config.gap_ms;
        let mut cursor = 0u64;
        let mut layout: Vec<(u64, u64)> = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            let duration = self.estimate_duration_ms(chunk);
            let is_last = index == chunks.len() - 1;
            // Nothing follows the final entry, so it keeps its full duration
            let visible = if is_last { duration } else { duration.saturating_sub(gap).max(1) };
            layout.push((cursor, cursor + visible));
            cursor += duration;
        }

        let accumulated = cursor;
        let target = seconds_to_ms(total_duration_seconds);

        if target == 0 {
            warn!(
                "Invalid target duration {}s, keeping estimated {}ms",
                total_duration_seconds, accumulated
            );
        } else if target != accumulated {
            debug!("Rescaling {} chunks from {}ms to {}ms", chunks.len(), accumulated, target);
            layout = Self::rescale(&layout, accumulated, target);

            // Every entry needs at least 1ms, so the target cannot be met
            let final_end = layout.last().map_or(target, |&(_, end)| end);
            if final_end > target {
                warn!(
                    "Target {}ms is too short for {} chunks, last entry ends at {}ms",
                    target, chunks.len(), final_end
                );
            }
        }

        chunks
            .iter()
            .zip(layout)
            .enumerate()
            .map(|(index, (chunk, (start, end)))| {
                SubtitleEntry::new(format!("sub_{}", index + 1), start, end, chunk.trim())
            })
            .collect()
    }

    /// Uniformly dilate every interval by `target / accumulated`, pinning the last end to `target`
    fn rescale(layout: &[(u64, u64)], accumulated: u64, target: u64) -> Vec<(u64, u64)> {
        let factor = target as f64 / accumulated as f64;
        let scale = |ms: u64| (ms as f64 * factor).round() as u64;

        let mut scaled: Vec<(u64, u64)> = Vec::with_capacity(layout.len());
        for &(start, end) in layout {
            let floor = scaled.last().map_or(0, |&(_, prev_end)| prev_end);
            let start = scale(start).max(floor);
            let end = scale(end).max(start + 1);
            scaled.push((start, end));
        }

        if let Some(last) = scaled.last_mut() {
            last.1 = target.max(last.0 + 1);
        }
        scaled
    }
}

impl Default for TimingAllocator {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}

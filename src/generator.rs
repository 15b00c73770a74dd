/*!
 * Subtitle generation pipeline.
 *
 * Turns sections of plain text with duration hints into timed entries:
 * segment each section into chunks, normalize Korean particles, allocate
 * timing against the section's duration, then shift the section after all
 * earlier ones.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app_config::{Config, FormattingConfig};
use crate::language_utils;
use crate::particles::ParticleSelector;
use crate::segmenter::TextSegmenter;
use crate::subtitle::{seconds_to_ms, SubtitleEntry};
use crate::timing::TimingAllocator;

/// One block of narrative text with its target duration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub text: String,
    #[serde(alias = "duration_seconds")]
    pub duration_seconds: f64,
}

/// Input from the text-generation collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub sections: Vec<Section>,

    /// Falls back to the configured language
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default, alias = "max_chars_per_line")]
    pub max_chars_per_line: Option<usize>,

    #[serde(default, alias = "max_lines")]
    pub max_lines: Option<usize>,
}

/// Builds a timeline's initial entries from generated text
pub struct SubtitleGenerator {
    language: String,
    formatting: FormattingConfig,
    allocator: TimingAllocator,
}

impl SubtitleGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            language: config.language.clone(),
            formatting: config.formatting.clone(),
            allocator: TimingAllocator::new(config.timing.clone()),
        }
    }

    /// Generate entries for every section, numbered `sub_1..` across the whole request
    pub fn generate(&self, request: &GenerationRequest) -> Vec<SubtitleEntry> {
        let language = request.language.as_deref().unwrap_or(&self.language);
        let korean = language_utils::is_korean(language);
        let max_chars = request.max_chars_per_line.unwrap_or(self.formatting.max_chars_per_line).max(1);
        let max_lines = request.max_lines.unwrap_or(self.formatting.max_lines).max(1);

        let mut entries = Vec::new();
        let mut offset_ms = 0u64;

        for (index, section) in request.sections.iter().enumerate() {
            let mut chunks = TextSegmenter::split_into_chunks(&section.text, max_chars, max_lines);
            if korean {
                chunks = chunks.iter().map(|chunk| ParticleSelector::process_text(chunk)).collect();
            }

            let allocated = self.allocator.allocate(&chunks, section.duration_seconds);
            debug!(
                "Section {}: {} chunks over {}s",
                index + 1,
                allocated.len(),
                section.duration_seconds
            );

            let section_end = allocated.last().map_or(0, |e| e.end_time_ms);
            for mut entry in allocated {
                entry.start_time_ms += offset_ms;
                entry.end_time_ms += offset_ms;
                entries.push(entry);
            }

            // An invalid section duration keeps the content estimate
            let duration_ms = seconds_to_ms(section.duration_seconds);
            offset_ms += if duration_ms > 0 { duration_ms } else { section_end };
        }

        for (index, entry) in entries.iter_mut().enumerate() {
            entry.id = format!("sub_{}", index + 1);
        }

        info!(
            "Generated {} subtitles from {} sections ({})",
            entries.len(),
            request.sections.len(),
            language
        );
        entries
    }
}
